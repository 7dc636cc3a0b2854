use crate::domain::Markup;
use std::cell::RefCell;
use std::rc::Rc;

/// Handle to the application container, the region every mounted screen
/// replaces wholesale. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct Container {
    contents: Rc<RefCell<Markup>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, markup: Markup) {
        *self.contents.borrow_mut() = markup;
    }

    pub fn contents(&self) -> Markup {
        self.contents.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_contents() {
        let container = Container::new();
        let handle = container.clone();
        assert!(container.is_empty());

        handle.replace(Markup::new("hello"));
        assert_eq!(container.contents().as_str(), "hello");
    }
}
