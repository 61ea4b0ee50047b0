//! Tool swings: a wind-up before the action lands, a cooldown after.

use bevy::prelude::*;
use std::time::Duration;

use crate::shared::*;

#[derive(Debug, Clone, Default)]
pub enum ToolPhase {
    #[default]
    Ready,
    WindUp {
        tool: ItemCode,
        target: GridPosition,
        timer: Timer,
    },
    Cooldown {
        timer: Timer,
    },
}

/// Gates tool actions so at most one swing is in flight.
#[derive(Resource, Debug, Clone, Default)]
pub struct ToolActionGate {
    pub phase: ToolPhase,
}

impl ToolActionGate {
    pub fn is_ready(&self) -> bool {
        matches!(self.phase, ToolPhase::Ready)
    }

    /// Start a swing. Returns false while another swing or its cooldown runs.
    pub fn begin(&mut self, tool: ItemCode, target: GridPosition, wind_up: Duration) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.phase = ToolPhase::WindUp {
            tool,
            target,
            timer: Timer::new(wind_up, TimerMode::Once),
        };
        true
    }

    /// Advance the swing. Yields the action on the tick its wind-up ends.
    pub fn tick(&mut self, delta: Duration, cooldown: Duration) -> Option<ToolActionEvent> {
        match &mut self.phase {
            ToolPhase::Ready => None,
            ToolPhase::WindUp { tool, target, timer } => {
                timer.tick(delta);
                if !timer.finished() {
                    return None;
                }
                let action = ToolActionEvent {
                    tool: *tool,
                    target: *target,
                };
                self.phase = ToolPhase::Cooldown {
                    timer: Timer::new(cooldown, TimerMode::Once),
                };
                Some(action)
            }
            ToolPhase::Cooldown { timer } => {
                timer.tick(delta);
                if timer.finished() {
                    self.phase = ToolPhase::Ready;
                }
                None
            }
        }
    }

    /// Drop a swing that has not landed yet. A running cooldown is kept.
    pub fn abort(&mut self) -> bool {
        if matches!(self.phase, ToolPhase::WindUp { .. }) {
            self.phase = ToolPhase::Ready;
            return true;
        }
        false
    }
}

/// Route item use requests: tools start a swing, seeds are planted.
pub fn handle_item_use_requests(
    mut requests: EventReader<ItemUseRequestEvent>,
    input: Res<PlayerInputState>,
    settings: Res<GameSettings>,
    item_registry: Res<ItemRegistry>,
    mut gate: ResMut<ToolActionGate>,
    mut plant_events: EventWriter<PlantSeedEvent>,
) {
    for req in requests.read() {
        if input.disabled {
            continue;
        }
        let Ok(details) = item_registry.get_item_details(req.item_code) else {
            continue;
        };

        if details.kind == ItemKind::Seed {
            plant_events.send(PlantSeedEvent {
                seed: req.item_code,
                target: req.target,
            });
        } else if details.kind.is_tool() {
            if !gate.begin(req.item_code, req.target, settings.tool_wind_up()) {
                debug!("[Player] {} still swinging", details.description);
            }
        }
    }
}

/// Tick the swing gate and release actions whose wind-up has ended.
/// Disabled input cancels a swing before it lands.
pub fn advance_tool_gate(
    time: Res<Time>,
    input: Res<PlayerInputState>,
    settings: Res<GameSettings>,
    mut gate: ResMut<ToolActionGate>,
    mut action_events: EventWriter<ToolActionEvent>,
) {
    if input.disabled && gate.abort() {
        debug!("[Player] tool swing cancelled");
    }

    if let Some(action) = gate.tick(time.delta(), settings.tool_cooldown()) {
        action_events.send(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIND_UP: Duration = Duration::from_millis(250);
    const COOLDOWN: Duration = Duration::from_millis(200);
    const STEP: Duration = Duration::from_millis(100);

    fn target() -> GridPosition {
        GridPosition::new(2, 2)
    }

    #[test]
    fn test_action_lands_after_wind_up() {
        let mut gate = ToolActionGate::default();
        assert!(gate.begin(2002, target(), WIND_UP));

        assert!(gate.tick(STEP, COOLDOWN).is_none());
        assert!(gate.tick(STEP, COOLDOWN).is_none());
        let action = gate.tick(STEP, COOLDOWN).expect("wind-up over");
        assert_eq!(action.tool, 2002);
        assert_eq!(action.target, target());
        assert!(matches!(gate.phase, ToolPhase::Cooldown { .. }));
    }

    #[test]
    fn test_busy_gate_refuses_new_swing() {
        let mut gate = ToolActionGate::default();
        assert!(gate.begin(2002, target(), WIND_UP));
        assert!(!gate.begin(2003, target(), WIND_UP));

        gate.tick(WIND_UP, COOLDOWN);
        assert!(!gate.begin(2003, target(), WIND_UP), "cooling down");

        gate.tick(COOLDOWN, COOLDOWN);
        assert!(gate.is_ready());
        assert!(gate.begin(2003, target(), WIND_UP));
    }

    #[test]
    fn test_one_action_per_swing() {
        let mut gate = ToolActionGate::default();
        gate.begin(2002, target(), WIND_UP);
        let landed = (0..20)
            .filter_map(|_| gate.tick(STEP, COOLDOWN))
            .count();
        assert_eq!(landed, 1);
    }

    #[test]
    fn test_abort_drops_pending_swing() {
        let mut gate = ToolActionGate::default();
        gate.begin(2002, target(), WIND_UP);
        gate.tick(STEP, COOLDOWN);

        assert!(gate.abort());
        assert!(gate.is_ready());
        assert!(gate.tick(WIND_UP, COOLDOWN).is_none());
    }

    #[test]
    fn test_abort_keeps_cooldown() {
        let mut gate = ToolActionGate::default();
        gate.begin(2002, target(), WIND_UP);
        gate.tick(WIND_UP, COOLDOWN);

        assert!(!gate.abort());
        assert!(!gate.is_ready());
    }
}
