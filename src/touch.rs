/*
 * Touch contact bookkeeping and detection of mouse messages synthesized from touch.
 *
 * Windows follows every touch gesture with mouse messages for legacy applications.
 * Most of them carry a signature in the message extra info, but not all, so a second
 * heuristic compares the message with the last touch message: same screen point as the
 * cursor and within a short time window means synthesized.
 */

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use crate::messages::{is_mouse_event_from_touch, point_from_lparam};
use crate::native::NativeWindow;

thread_local! {
    // Shared by every window on the thread, like the message time it is compared with.
    static LAST_TOUCH_MESSAGE_TIME: Cell<u32> = const { Cell::new(0) };
}

pub fn last_touch_message_time() -> u32 {
    LAST_TOUCH_MESSAGE_TIME.with(Cell::get)
}

pub fn set_last_touch_message_time(time: u32) {
    LAST_TOUCH_MESSAGE_TIME.with(|t| t.set(time));
}

/*
 * Maps native contact ids, which are arbitrary and may be large, to small generated
 * ids. A new contact receives the lowest number not currently in use. Numbers are only
 * returned to the pool by `release_number`, which the caller invokes after the release
 * event for that contact has been built.
 */
#[derive(Debug, Default)]
pub struct TouchIdGenerator {
    assigned: BTreeMap<u32, u32>,
    in_use: BTreeSet<u32>,
}

impl TouchIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generated_id(&mut self, native_id: u32) -> u32 {
        if let Some(&id) = self.assigned.get(&native_id) {
            return id;
        }
        let id = (0u32..)
            .find(|candidate| !self.in_use.contains(candidate))
            .unwrap_or(u32::MAX);
        self.assigned.insert(native_id, id);
        self.in_use.insert(id);
        id
    }

    pub fn release_number(&mut self, native_id: u32) {
        if let Some(id) = self.assigned.remove(&native_id) {
            self.in_use.remove(&id);
        }
    }

    pub fn live_count(&self) -> usize {
        self.assigned.len()
    }
}

/// Native ids of the contacts currently down, plus their generated ids.
#[derive(Debug, Default)]
pub struct TouchTracker {
    pub contacts: BTreeSet<u32>,
    pub ids: TouchIdGenerator,
}

impl TouchTracker {
    pub fn has_live_contacts(&self) -> bool {
        !self.contacts.is_empty()
    }
}

/*
 * A mouse message is synthesized when it carries the touch signature, or when it
 * arrives no earlier than the last touch message and at most `window_ms` later, at the
 * exact screen position of the cursor. `lparam` holds the message position in client
 * coordinates.
 */
pub fn is_synthesized_mouse_message<W: NativeWindow + ?Sized>(
    native: &W,
    extra_info: usize,
    message_time: u32,
    lparam: isize,
    window_ms: u32,
) -> bool {
    if is_mouse_event_from_touch(extra_info) {
        return true;
    }
    let last = last_touch_message_time();
    if last != 0 && message_time >= last && message_time - last <= window_ms {
        let mouse_location = native.client_to_screen(point_from_lparam(lparam));
        return native.cursor_pos() == mouse_location;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::make_lparam;
    use crate::test_support::FakeWindow;
    use crate::types::Point;

    #[test]
    fn generator_hands_out_lowest_free_id() {
        let mut ids = TouchIdGenerator::new();
        assert_eq!(ids.generated_id(1001), 0);
        assert_eq!(ids.generated_id(1002), 1);
        assert_eq!(ids.generated_id(1001), 0);

        ids.release_number(1001);
        assert_eq!(ids.generated_id(1003), 0);
        assert_eq!(ids.generated_id(1004), 2);
    }

    #[test]
    fn ids_stay_unique_while_live() {
        let mut ids = TouchIdGenerator::new();
        let generated: Vec<u32> = (0..5).map(|n| ids.generated_id(500 + n)).collect();
        let unique: BTreeSet<u32> = generated.iter().copied().collect();
        assert_eq!(unique.len(), 5);
        assert_eq!(ids.live_count(), 5);
    }

    #[test]
    fn synthesis_window_boundaries() {
        let native = FakeWindow::new();
        native.client_origin.set(Point::new(100, 200));
        native.cursor.set(Point::new(110, 210));
        let at_cursor = make_lparam(10, 10);
        set_last_touch_message_time(1_000);

        assert!(is_synthesized_mouse_message(&native, 0, 1_000, at_cursor, 500));
        assert!(is_synthesized_mouse_message(&native, 0, 1_500, at_cursor, 500));
        assert!(!is_synthesized_mouse_message(&native, 0, 1_501, at_cursor, 500));
        assert!(!is_synthesized_mouse_message(&native, 0, 999, at_cursor, 500));
        assert!(!is_synthesized_mouse_message(
            &native,
            0,
            1_200,
            make_lparam(11, 10),
            500
        ));
    }

    #[test]
    fn signature_marks_message_regardless_of_timing() {
        let native = FakeWindow::new();
        set_last_touch_message_time(0);
        assert!(is_synthesized_mouse_message(
            &native,
            0xFF51_5701,
            99_999,
            0,
            500
        ));
        assert!(!is_synthesized_mouse_message(&native, 0, 99_999, 0, 500));
    }
}
