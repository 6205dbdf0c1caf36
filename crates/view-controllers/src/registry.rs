//! Registry of visible leaf controllers

use std::cell::RefCell;

/// Ids of the leaf controllers that are currently appeared, in appearance order
#[derive(Debug, Default)]
pub struct ChildControllersRegistry {
    children: RefCell<Vec<String>>,
}

impl ChildControllersRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a controller appeared
    pub fn on_appeared(&self, id: &str) {
        let mut children = self.children.borrow_mut();
        if !children.iter().any(|child| child == id) {
            children.push(id.to_string());
        }
    }

    /// Record that a controller disappeared or was destroyed
    pub fn on_disappeared(&self, id: &str) {
        self.children.borrow_mut().retain(|child| child != id);
    }

    /// Whether a controller is currently appeared
    pub fn contains(&self, id: &str) -> bool {
        self.children.borrow().iter().any(|child| child == id)
    }

    /// Number of appeared controllers
    pub fn size(&self) -> usize {
        self.children.borrow().len()
    }

    /// Ids of appeared controllers, oldest first
    pub fn ids(&self) -> Vec<String> {
        self.children.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_tracks_appeared_children() {
        let registry = ChildControllersRegistry::new();
        registry.on_appeared("a");
        registry.on_appeared("b");
        registry.on_appeared("a");
        assert_eq!(registry.size(), 2);

        registry.on_disappeared("a");
        assert!(!registry.contains("a"));
        assert_eq!(registry.ids(), vec!["b".to_string()]);

        registry.on_disappeared("missing");
        assert_eq!(registry.size(), 1);
    }
}
