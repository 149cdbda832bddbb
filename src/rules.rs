//! Automaton transition rules.
//!
//! Rules are a closed set of tagged variants, each implementing the same
//! contract: `next_state(self_state, alive_neighbors)`.
//! The CPU implementation is the authoritative definition used by tests;
//! [`Rule::to_wgsl`] emits the equivalent WGSL `evaluate` body that the
//! step pass compiles once at pipeline build time. There is no runtime
//! shader assembly beyond splicing the per-rule body into the shared
//! template.

use crate::color::{CellState, ColorSlot, ColorSlotId};

/// The six supported cellular automata.
///
/// All rules share toroidal wraparound, Moore (8-cell) neighborhoods, and
/// the copy-step escape hatch; they differ only in their birth/survival
/// predicate over the neighbor counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Rule {
    /// Conway's Game of Life: survive on 2-3 alive neighbors, born on
    /// exactly 3.
    #[default]
    GameOfLife,

    /// Brian's Brain: a dead cell with exactly 2 alive neighbors is born;
    /// alive cells always decay to dying, dying cells to dead. Dying
    /// cells are not counted as alive and block birth.
    BriansBrain,

    /// Seeds: born on exactly 2 alive neighbors, never survives.
    Seeds,

    /// Maze: survive on 1-5 alive neighbors, born on exactly 3.
    Maze,

    /// Day & Night: survive on {3,4,6,7,8}, born on {3,6,7,8}.
    DayAndNight,

    /// Life without Death: once alive, always alive; born on exactly 3.
    LifeWithoutDeath,
}

const SHARED_SLOTS: &[ColorSlot] = &[
    ColorSlot { id: ColorSlotId::Alive, label: "Alive" },
    ColorSlot { id: ColorSlotId::Dead, label: "Background" },
    ColorSlot { id: ColorSlotId::Grid, label: "Grid lines" },
];

const BRIANS_BRAIN_SLOTS: &[ColorSlot] = &[
    ColorSlot { id: ColorSlotId::Alive, label: "Alive" },
    ColorSlot { id: ColorSlotId::Dead, label: "Background" },
    ColorSlot { id: ColorSlotId::Grid, label: "Grid lines" },
    ColorSlot { id: ColorSlotId::Dying, label: "Dying" },
];

impl Rule {
    /// All rules, in presentation order.
    pub const ALL: [Rule; 6] = [
        Rule::GameOfLife,
        Rule::BriansBrain,
        Rule::Seeds,
        Rule::Maze,
        Rule::DayAndNight,
        Rule::LifeWithoutDeath,
    ];

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Rule::GameOfLife => "Game of Life",
            Rule::BriansBrain => "Brian's Brain",
            Rule::Seeds => "Seeds",
            Rule::Maze => "Maze",
            Rule::DayAndNight => "Day & Night",
            Rule::LifeWithoutDeath => "Life without Death",
        }
    }

    /// The color slots this rule exposes to `change_color`.
    pub fn color_slots(&self) -> &'static [ColorSlot] {
        match self {
            Rule::BriansBrain => BRIANS_BRAIN_SLOTS,
            _ => SHARED_SLOTS,
        }
    }

    pub fn has_color_slot(&self, slot: ColorSlotId) -> bool {
        self.color_slots().iter().any(|s| s.id == slot)
    }

    /// Whether a dead cell with `alive` living neighbors is born.
    pub fn born(&self, alive: u32) -> bool {
        match self {
            Rule::GameOfLife => alive == 3,
            Rule::BriansBrain => alive == 2,
            Rule::Seeds => alive == 2,
            Rule::Maze => alive == 3,
            Rule::DayAndNight => matches!(alive, 3 | 6 | 7 | 8),
            Rule::LifeWithoutDeath => alive == 3,
        }
    }

    /// Whether an alive cell with `alive` living neighbors survives.
    pub fn survives(&self, alive: u32) -> bool {
        match self {
            Rule::GameOfLife => alive == 2 || alive == 3,
            Rule::BriansBrain => false,
            Rule::Seeds => false,
            Rule::Maze => (1..=5).contains(&alive),
            Rule::DayAndNight => matches!(alive, 3 | 4 | 6 | 7 | 8),
            Rule::LifeWithoutDeath => true,
        }
    }

    /// The transition function. This is the CPU mirror of the WGSL body
    /// emitted by [`Rule::to_wgsl`]; the two must agree.
    pub fn next_state(&self, state: CellState, alive: u32) -> CellState {
        match self {
            Rule::BriansBrain => match state {
                CellState::Alive => CellState::Dying,
                CellState::Dying => CellState::Dead,
                CellState::Dead if self.born(alive) => CellState::Alive,
                CellState::Dead => CellState::Dead,
            },
            _ => {
                let was_alive = state == CellState::Alive;
                if (was_alive && self.survives(alive)) || (!was_alive && self.born(alive)) {
                    CellState::Alive
                } else {
                    CellState::Dead
                }
            }
        }
    }

    /// WGSL body of `fn evaluate(self_state: u32, alive: u32) -> u32`.
    ///
    /// `DEAD`, `ALIVE`, and `DYING` constants come from the shared step
    /// template.
    pub fn to_wgsl(&self) -> String {
        match self {
            Rule::GameOfLife => r#"    if self_state == ALIVE {
        if alive == 2u || alive == 3u {
            return ALIVE;
        }
        return DEAD;
    }
    if alive == 3u {
        return ALIVE;
    }
    return DEAD;"#
                .to_string(),

            Rule::BriansBrain => r#"    if self_state == ALIVE {
        return DYING;
    }
    if self_state == DYING {
        return DEAD;
    }
    if alive == 2u {
        return ALIVE;
    }
    return DEAD;"#
                .to_string(),

            Rule::Seeds => r#"    if self_state != ALIVE && alive == 2u {
        return ALIVE;
    }
    return DEAD;"#
                .to_string(),

            Rule::Maze => r#"    if self_state == ALIVE {
        if alive >= 1u && alive <= 5u {
            return ALIVE;
        }
        return DEAD;
    }
    if alive == 3u {
        return ALIVE;
    }
    return DEAD;"#
                .to_string(),

            Rule::DayAndNight => r#"    if self_state == ALIVE {
        if alive == 3u || alive == 4u || alive >= 6u {
            return ALIVE;
        }
        return DEAD;
    }
    if alive == 3u || alive >= 6u {
        return ALIVE;
    }
    return DEAD;"#
                .to_string(),

            Rule::LifeWithoutDeath => r#"    if self_state == ALIVE {
        return ALIVE;
    }
    if alive == 3u {
        return ALIVE;
    }
    return DEAD;"#
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CellState::{Alive, Dead, Dying};

    fn birth_table(rule: Rule) -> [bool; 9] {
        std::array::from_fn(|n| rule.next_state(Dead, n as u32) == Alive)
    }

    fn survival_table(rule: Rule) -> [bool; 9] {
        std::array::from_fn(|n| rule.next_state(Alive, n as u32) == Alive)
    }

    #[test]
    fn test_game_of_life_tables() {
        let rule = Rule::GameOfLife;
        assert_eq!(birth_table(rule), [false, false, false, true, false, false, false, false, false]);
        assert_eq!(survival_table(rule), [false, false, true, true, false, false, false, false, false]);
    }

    #[test]
    fn test_seeds_tables() {
        let rule = Rule::Seeds;
        assert_eq!(birth_table(rule), [false, false, true, false, false, false, false, false, false]);
        // Alive cells always die, whatever the neighborhood.
        assert_eq!(survival_table(rule), [false; 9]);
    }

    #[test]
    fn test_maze_tables() {
        let rule = Rule::Maze;
        assert_eq!(birth_table(rule), [false, false, false, true, false, false, false, false, false]);
        assert_eq!(survival_table(rule), [false, true, true, true, true, true, false, false, false]);
    }

    #[test]
    fn test_day_and_night_tables() {
        let rule = Rule::DayAndNight;
        assert_eq!(birth_table(rule), [false, false, false, true, false, false, true, true, true]);
        assert_eq!(survival_table(rule), [false, false, false, true, true, false, true, true, true]);
    }

    #[test]
    fn test_life_without_death_tables() {
        let rule = Rule::LifeWithoutDeath;
        assert_eq!(birth_table(rule), [false, false, false, true, false, false, false, false, false]);
        assert_eq!(survival_table(rule), [true; 9]);
    }

    #[test]
    fn test_brians_brain_cycle() {
        let rule = Rule::BriansBrain;
        // Alive decays to dying, dying to dead, regardless of neighbors.
        for n in 0..=8 {
            assert_eq!(rule.next_state(Alive, n), Dying);
            assert_eq!(rule.next_state(Dying, n), Dead);
        }
        // Born on exactly two alive neighbors, only from the dead state.
        assert_eq!(rule.next_state(Dead, 2), Alive);
        for n in [0, 1, 3, 4, 5, 6, 7, 8] {
            assert_eq!(rule.next_state(Dead, n), Dead);
        }
    }

    #[test]
    fn test_dying_state_is_not_alive_for_two_state_rules() {
        // A leftover Dying texel (e.g. after a rule swap away from Brian's
        // Brain) must behave like a dead cell.
        for rule in [Rule::GameOfLife, Rule::Seeds, Rule::Maze, Rule::DayAndNight, Rule::LifeWithoutDeath] {
            assert_eq!(rule.next_state(Dying, 3), Alive, "{} births from dying", rule.label());
            assert_eq!(rule.next_state(Dying, 0), Dead);
        }
    }

    #[test]
    fn test_color_slots() {
        assert!(Rule::GameOfLife.has_color_slot(ColorSlotId::Alive));
        assert!(!Rule::GameOfLife.has_color_slot(ColorSlotId::Dying));
        assert!(Rule::BriansBrain.has_color_slot(ColorSlotId::Dying));
    }

    #[test]
    fn test_wgsl_bodies_mention_no_undefined_names() {
        // The bodies may only reference the template-provided names.
        for rule in Rule::ALL {
            let body = rule.to_wgsl();
            assert!(body.contains("return"));
            for token in body.split(|c: char| !c.is_alphanumeric() && c != '_') {
                if token.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                    assert!(
                        ["DEAD", "ALIVE", "DYING"].contains(&token),
                        "unexpected identifier {token} in {} body",
                        rule.label()
                    );
                }
            }
        }
    }
}
