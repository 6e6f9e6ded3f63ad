//! App sections (e.g. the tasks app), each driving one lazily created controller

/// Something that can be displayed when its app section is launched
pub trait Controller {
    fn show(&mut self);
}

/// An app section, that builds its controller on first use and keeps it for its whole lifetime
pub struct AppSection<C: Controller> {
    name: String,
    factory: Box<dyn Fn() -> C>,
    controller: Option<C>,

    active: bool,
    current_view: Option<String>,
}

impl<C: Controller> AppSection<C> {
    pub fn new<F>(name: &str, factory: F) -> Self
    where
        F: Fn() -> C + 'static,
    {
        Self {
            name: name.to_string(),
            factory: Box::new(factory),
            controller: None,
            active: false,
            current_view: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the controller of this section, building it if needed
    pub fn controller(&mut self) -> &mut C {
        let factory = &self.factory;
        let name = &self.name;
        self.controller.get_or_insert_with(|| {
            log::debug!("Creating the controller of app {}", name);
            factory()
        })
    }

    pub fn has_controller(&self) -> bool {
        self.controller.is_some()
    }

    /// Show the controller of this section, then run `callback` (if any)
    pub fn launch<F: FnOnce()>(&mut self, callback: Option<F>) {
        self.controller().show();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Called when this section gets (or loses) the focus
    pub fn activate(&mut self, active: bool, view: Option<&str>) {
        self.active = active;
        self.current_view = view.map(String::from);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_view(&self) -> Option<&str> {
        self.current_view.as_deref()
    }
}


#[cfg(test)]
mod test {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingController {
        shown: u32,
    }

    impl Controller for CountingController {
        fn show(&mut self) {
            self.shown += 1;
        }
    }

    #[test]
    fn test_controller_is_built_once() {
        let built = Rc::new(Cell::new(0));
        let built_clone = Rc::clone(&built);
        let mut app = AppSection::new("tasks", move || {
            built_clone.set(built_clone.get() + 1);
            CountingController { shown: 0 }
        });
        assert!(app.has_controller() == false);
        assert_eq!(built.get(), 0);

        app.controller();
        app.controller();
        assert_eq!(built.get(), 1);
        assert!(app.has_controller());
    }

    #[test]
    fn test_launch() {
        let mut app = AppSection::new("tasks", || CountingController { shown: 0 });

        let called = Cell::new(false);
        app.launch(Some(|| called.set(true)));
        assert!(called.get());
        assert_eq!(app.controller().shown, 1);

        app.launch(None::<fn()>);
        assert_eq!(app.controller().shown, 2);
    }

    #[test]
    fn test_activate() {
        let mut app = AppSection::new("tasks", || CountingController { shown: 0 });
        assert!(app.is_active() == false);
        app.activate(true, Some("TKL"));
        assert!(app.is_active());
        assert_eq!(app.current_view(), Some("TKL"));
        app.activate(false, None);
        assert!(app.is_active() == false);
        assert_eq!(app.name(), "tasks");
    }
}
