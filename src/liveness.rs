/*
 * Revocable weak references for work that outlives the call that scheduled it.
 *
 * Default message processing and delegate callbacks can destroy the window, and the
 * handler with it, synchronously in the middle of a call. Any code that touches handler
 * state after such a call takes a `LivenessToken` first and checks it afterwards.
 * Deferred tasks capture a token the same way. Invalidating the factory revokes every
 * token handed out so far without affecting tokens issued later.
 */

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug)]
pub struct LivenessFactory {
    current: RefCell<Rc<Cell<bool>>>,
}

impl Default for LivenessFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LivenessFactory {
    pub fn new() -> Self {
        Self {
            current: RefCell::new(Rc::new(Cell::new(true))),
        }
    }

    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            flag: Rc::clone(&self.current.borrow()),
        }
    }

    /// Revokes all outstanding tokens.
    pub fn invalidate(&self) {
        let old = self.current.replace(Rc::new(Cell::new(true)));
        old.set(false);
    }

    pub fn has_tokens(&self) -> bool {
        Rc::strong_count(&self.current.borrow()) > 1
    }
}

impl Drop for LivenessFactory {
    fn drop(&mut self) {
        self.current.get_mut().set(false);
    }
}

#[derive(Debug, Clone)]
pub struct LivenessToken {
    flag: Rc<Cell<bool>>,
}

impl LivenessToken {
    pub fn is_alive(&self) -> bool {
        self.flag.get()
    }
}
