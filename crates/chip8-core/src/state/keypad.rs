/// Number of keys on the hexadecimal keypad.
pub const KEY_COUNT: usize = 16;

/// Down/up state of the sixteen keys, written only by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    /// Sets the state of `key` (low nibble used).
    pub const fn set(&mut self, key: u8, down: bool) {
        self.keys[(key & 0x0F) as usize] = down;
    }

    /// Returns `true` when `key` (low nibble used) is down.
    #[must_use]
    pub const fn is_down(&self, key: u8) -> bool {
        self.keys[(key & 0x0F) as usize]
    }

    /// Releases every key.
    pub const fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Highest-numbered key currently down.
    #[must_use]
    pub fn pressed_key(&self) -> Option<u8> {
        (0..=0x0Fu8).rev().find(|key| self.is_down(*key))
    }
}

#[cfg(test)]
mod tests {
    use super::Keypad;

    #[test]
    fn default_keypad_has_no_key_down() {
        let keypad = Keypad::default();
        assert_eq!(keypad.pressed_key(), None);
        assert!((0..16).all(|key| !keypad.is_down(key)));
    }

    #[test]
    fn set_and_release_single_key() {
        let mut keypad = Keypad::default();
        keypad.set(0xA, true);
        assert!(keypad.is_down(0xA));
        assert_eq!(keypad.pressed_key(), Some(0xA));
        keypad.set(0xA, false);
        assert_eq!(keypad.pressed_key(), None);
    }

    #[test]
    fn pressed_key_prefers_highest_index() {
        let mut keypad = Keypad::default();
        keypad.set(0x2, true);
        keypad.set(0xC, true);
        assert_eq!(keypad.pressed_key(), Some(0xC));
        keypad.release_all();
        assert_eq!(keypad.pressed_key(), None);
    }

    #[test]
    fn key_index_uses_low_nibble() {
        let mut keypad = Keypad::default();
        keypad.set(0x13, true);
        assert!(keypad.is_down(0x3));
    }
}
