/// Status lamp: maps lives / game-active onto an LED-style colour.
///
/// ┌──────────────────────┬────────┐
/// │ Status               │ Lamp   │
/// ├──────────────────────┼────────┤
/// │ lives == 0           │ Red    │
/// │ not active           │ Blue   │
/// │ active, 3 lives      │ Green  │
/// │ active, 2 lives      │ Yellow │
/// │ active, 1 life       │ Orange │
/// └──────────────────────┴────────┘

use crossterm::style::Color;

use crate::sim::event::Status;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Lamp {
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
}

impl Lamp {
    pub fn from_status(status: Status) -> Lamp {
        match (status.lives, status.game_active) {
            (0, _) => Lamp::Red,
            (_, false) => Lamp::Blue,
            (3.., true) => Lamp::Green,
            (2, true) => Lamp::Yellow,
            (1, true) => Lamp::Orange,
        }
    }

    pub fn colour(self) -> Color {
        match self {
            Lamp::Blue   => Color::Rgb { r: 0x00, g: 0x00, b: 0xFF },
            Lamp::Green  => Color::Rgb { r: 0x80, g: 0xFF, b: 0x00 },
            Lamp::Yellow => Color::Rgb { r: 0xFF, g: 0xFF, b: 0x00 },
            Lamp::Orange => Color::Rgb { r: 0xFF, g: 0x80, b: 0x00 },
            Lamp::Red    => Color::Rgb { r: 0xFF, g: 0x00, b: 0x00 },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lamp::Blue => "ready",
            Lamp::Green => "3 lives",
            Lamp::Yellow => "2 lives",
            Lamp::Orange => "1 life",
            Lamp::Red => "no lives",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp(lives: u8, game_active: bool) -> Lamp {
        Lamp::from_status(Status { lives, game_active })
    }

    #[test]
    fn active_lamp_follows_lives() {
        assert_eq!(lamp(3, true), Lamp::Green);
        assert_eq!(lamp(2, true), Lamp::Yellow);
        assert_eq!(lamp(1, true), Lamp::Orange);
        assert_eq!(lamp(0, true), Lamp::Red);
    }

    #[test]
    fn inactive_lamp_is_blue_unless_dead() {
        assert_eq!(Lamp::from_status(Status::idle()), Lamp::Blue);
        assert_eq!(lamp(2, false), Lamp::Blue);
        assert_eq!(lamp(0, false), Lamp::Red);
    }

    #[test]
    fn colours_are_distinct() {
        let all = [Lamp::Blue, Lamp::Green, Lamp::Yellow, Lamp::Orange, Lamp::Red];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.colour(), b.colour());
            }
        }
        assert_eq!(Lamp::Red.colour(), Color::Rgb { r: 255, g: 0, b: 0 });
    }
}
