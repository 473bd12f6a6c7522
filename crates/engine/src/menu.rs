//! Main menu model: offered options, cursor and chosen start level.

use arrayvec::ArrayVec;

use crate::types::{Direction, MAX_START_LEVEL, MIN_START_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    StartGame,
    AdjustLevel,
    LoadGame,
    Scoreboard,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::StartGame => "Start Game",
            MenuItem::AdjustLevel => "Adjust Level",
            MenuItem::LoadGame => "Load Game",
            MenuItem::Scoreboard => "Scoreboard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainMenu {
    items: ArrayVec<MenuItem, 4>,
    cursor: usize,
    start_level: u32,
}

impl MainMenu {
    /// "Load Game" is only offered when `has_save` is true.
    pub fn new(has_save: bool, start_level: u32) -> Self {
        let mut items = ArrayVec::new();
        items.push(MenuItem::StartGame);
        items.push(MenuItem::AdjustLevel);
        if has_save {
            items.push(MenuItem::LoadGame);
        }
        items.push(MenuItem::Scoreboard);
        Self {
            items,
            cursor: 0,
            start_level: start_level.clamp(MIN_START_LEVEL, MAX_START_LEVEL),
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> MenuItem {
        self.items[self.cursor]
    }

    pub fn start_level(&self) -> u32 {
        self.start_level
    }

    pub fn offers_load(&self) -> bool {
        self.items.contains(&MenuItem::LoadGame)
    }

    pub fn cursor_down(&mut self) {
        self.cursor = (self.cursor + 1) % self.items.len();
    }

    pub fn cursor_up(&mut self) {
        self.cursor = (self.cursor + self.items.len() - 1) % self.items.len();
    }

    /// Step the start level with wrap-around. Only works while
    /// "Adjust Level" is highlighted; returns whether the level changed.
    pub fn adjust_level(&mut self, direction: Direction) -> bool {
        if self.selected() != MenuItem::AdjustLevel {
            return false;
        }
        self.start_level = match direction {
            Direction::Right if self.start_level >= MAX_START_LEVEL => MIN_START_LEVEL,
            Direction::Right => self.start_level + 1,
            Direction::Left if self.start_level <= MIN_START_LEVEL => MAX_START_LEVEL,
            Direction::Left => self.start_level - 1,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_depend_on_saves() {
        assert_eq!(MainMenu::new(false, 1).items().len(), 3);
        let menu = MainMenu::new(true, 1);
        assert_eq!(
            menu.items(),
            &[
                MenuItem::StartGame,
                MenuItem::AdjustLevel,
                MenuItem::LoadGame,
                MenuItem::Scoreboard
            ]
        );
    }

    #[test]
    fn test_cursor_wraps() {
        let mut menu = MainMenu::new(false, 1);
        menu.cursor_up();
        assert_eq!(menu.selected(), MenuItem::Scoreboard);
        menu.cursor_down();
        assert_eq!(menu.selected(), MenuItem::StartGame);
    }

    #[test]
    fn test_level_wraps_only_on_adjust_item() {
        let mut menu = MainMenu::new(false, 1);
        assert!(!menu.adjust_level(Direction::Right));
        menu.cursor_down();
        assert!(menu.adjust_level(Direction::Left));
        assert_eq!(menu.start_level(), 10);
        assert!(menu.adjust_level(Direction::Right));
        assert_eq!(menu.start_level(), 1);
        menu.adjust_level(Direction::Right);
        assert_eq!(menu.start_level(), 2);
    }
}
