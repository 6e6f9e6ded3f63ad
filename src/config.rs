//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

use crate::organizer::ViewType;

/// The longest name the server accepts for an organizer
pub const MAX_NAME_LENGTH: usize = 128;

/// Label displayed in place of the name of the root of a calendar tree.
/// Feel free to override it with a localized value when initing this library.
pub static CALENDARS_ROOT_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Calendars".to_string())));

/// Label displayed in place of the name of the root of a task list tree.
/// Feel free to override it with a localized value when initing this library.
pub static TASKS_ROOT_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Tasks".to_string())));

/// The label of the root of a tree of the given view
pub fn root_name(view: ViewType) -> String {
    let label = match view {
        ViewType::Calendar => &CALENDARS_ROOT_NAME,
        ViewType::Task => &TASKS_ROOT_NAME,
    };
    match label.lock() {
        Ok(name) => name.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
