/// Gamepad keyer using gilrs.
///
/// Each button press is translated into one entry action. Button mapping is
/// loaded from config.toml via `load_button_config()`. Default mapping:
///   A                 →  Dot
///   B                 →  Dash
///   X / R1            →  Letter gap
///   Y / L1            →  Erase
///   Start             →  Submit
///   Select            →  Cancel

#[cfg(feature = "gamepad")]
use gilrs::{Button, EventType, Gilrs};
use log::debug;

use crate::config::GamepadConfig;
use crate::ui::input::EntryAction;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug)]
struct ActionMap {
    dot: Vec<Btn>,
    dash: Vec<Btn>,
    gap: Vec<Btn>,
    submit: Vec<Btn>,
    erase: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            dot:    vec![Btn::A],
            dash:   vec![Btn::B],
            gap:    vec![Btn::X, Btn::R1],
            submit: vec![Btn::Start],
            erase:  vec![Btn::Y, Btn::L1],
            cancel: vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// First action bound to `btn`. Cancel wins over everything else.
    fn action_for(&self, btn: Btn) -> Option<EntryAction> {
        if self.cancel.contains(&btn) {
            Some(EntryAction::Cancel)
        } else if self.submit.contains(&btn) {
            Some(EntryAction::Submit)
        } else if self.erase.contains(&btn) {
            Some(EntryAction::Erase)
        } else if self.dot.contains(&btn) {
            Some(EntryAction::Push('.'))
        } else if self.dash.contains(&btn) {
            Some(EntryAction::Push('-'))
        } else if self.gap.contains(&btn) {
            Some(EntryAction::Push(' '))
        } else {
            None
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    action_map: ActionMap,
    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    debug!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Lists with no recognised button
    /// keep their defaults.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names
                .iter()
                .filter_map(|s| {
                    let btn = Btn::from_name(s);
                    if btn.is_none() {
                        debug!("ignoring unknown button name {s:?}");
                    }
                    btn
                })
                .collect()
        }
        fn apply(slot: &mut Vec<Btn>, names: &[String]) {
            let parsed = parse_list(names);
            if !parsed.is_empty() {
                *slot = parsed;
            }
        }
        let map = &mut self.action_map;
        apply(&mut map.dot, &cfg.dot);
        apply(&mut map.dash, &cfg.dash);
        apply(&mut map.gap, &cfg.gap);
        apply(&mut map.submit, &cfg.submit);
        apply(&mut map.erase, &cfg.erase);
        apply(&mut map.cancel, &cfg.cancel);
    }

    /// Drain pending gamepad events; return the action of the first
    /// mapped button press, if any.
    #[cfg(feature = "gamepad")]
    pub fn poll_action(&mut self) -> Option<EntryAction> {
        let gilrs = self.gilrs.as_mut()?;
        let mut action = None;
        while let Some(event) = gilrs.next_event() {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    if action.is_none() {
                        action = Btn::from_gilrs(btn).and_then(|b| self.action_map.action_for(b));
                    }
                }
                EventType::Connected => self.connected = true,
                EventType::Disconnected => self.connected = false,
                _ => {}
            }
        }
        action
    }

    #[cfg(not(feature = "gamepad"))]
    pub fn poll_action(&mut self) -> Option<EntryAction> {
        None
    }
}
