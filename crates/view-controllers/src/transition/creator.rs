//! Builds transition sets from declared animations

use futures_util::future::{join, join_all};
use nav_options::{AnimationOptions, SharedElementTransitionOptions};

use super::finder::{ExistingViewFinder, OptimisticViewFinder, ViewFinder};
use super::{ElementTransition, SharedElementTransition, TransitionSet};
use crate::controller::ViewController;
use crate::view::ElementRef;

/// Matches declared transitions against the views of two screens
pub struct TransitionSetCreator {
    existing: Box<dyn ViewFinder>,
    optimistic: Box<dyn ViewFinder>,
}

impl Default for TransitionSetCreator {
    fn default() -> Self {
        Self::new(Box::new(ExistingViewFinder), Box::new(OptimisticViewFinder))
    }
}

impl TransitionSetCreator {
    /// Create a creator with custom lookup strategies
    pub fn new(existing: Box<dyn ViewFinder>, optimistic: Box<dyn ViewFinder>) -> Self {
        Self { existing, optimistic }
    }

    /// Match transitions between a source and a destination screen
    ///
    /// Source-side lookups try the existing view first and fall back to the
    /// optimistic finder; destination-side lookups are optimistic.
    pub async fn create(
        &self,
        from: &dyn ViewController,
        to: &dyn ViewController,
        shared_elements: &[SharedElementTransitionOptions],
        elements: &[AnimationOptions],
    ) -> TransitionSet {
        let shared = join_all(shared_elements.iter().map(|options| self.match_shared(from, to, options)));
        let single = join_all(elements.iter().map(|options| self.match_element(from, to, options)));
        let (shared, single) = join(shared, single).await;
        Self::collect(shared, single)
    }

    /// Match transitions of a single appearing screen
    ///
    /// Both ends of a shared element are looked up on `screen`.
    pub async fn create_for_screen(
        &self,
        screen: &dyn ViewController,
        shared_elements: &[SharedElementTransitionOptions],
        elements: &[AnimationOptions],
    ) -> TransitionSet {
        let shared = join_all(shared_elements.iter().map(|options| self.match_shared(screen, screen, options)));
        let single = join_all(elements.iter().map(|options| async move {
            let element = match options.id.get() {
                Some(id) => self.optimistic.find(screen, id).await,
                None => None,
            };
            ElementTransition { options: options.clone(), element }
        }));
        let (shared, single) = join(shared, single).await;
        Self::collect(shared, single)
    }

    async fn find_on_source(&self, screen: &dyn ViewController, element_id: &str) -> Option<ElementRef> {
        match self.existing.find(screen, element_id).await {
            Some(found) => Some(found),
            None => self.optimistic.find(screen, element_id).await,
        }
    }

    async fn match_shared(
        &self,
        from: &dyn ViewController,
        to: &dyn ViewController,
        options: &SharedElementTransitionOptions,
    ) -> SharedElementTransition {
        let from_element = match options.from_id.get() {
            Some(id) => self.find_on_source(from, id).await,
            None => None,
        };
        let to_element = match options.to_id.get() {
            Some(id) => self.optimistic.find(to, id).await,
            None => None,
        };
        SharedElementTransition { options: options.clone(), from: from_element, to: to_element }
    }

    async fn match_element(
        &self,
        from: &dyn ViewController,
        to: &dyn ViewController,
        options: &AnimationOptions,
    ) -> ElementTransition {
        let element = match options.id.get() {
            Some(id) => match self.existing.find(from, id).await {
                Some(found) => Some(found),
                None => self.optimistic.find(to, id).await,
            },
            None => None,
        };
        ElementTransition { options: options.clone(), element }
    }

    fn collect(shared: Vec<SharedElementTransition>, single: Vec<ElementTransition>) -> TransitionSet {
        let set = TransitionSet {
            shared_elements: shared.into_iter().filter(SharedElementTransition::is_valid).collect(),
            elements: single.into_iter().filter(ElementTransition::is_valid).collect(),
        };
        tracing::debug!(matched = set.size(), "Matched element transitions");
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Harness;
    use nav_options::Param;

    fn shared(from: &str, to: &str) -> SharedElementTransitionOptions {
        SharedElementTransitionOptions {
            from_id: Param::Set(from.to_string()),
            to_id: Param::Set(to.to_string()),
            ..Default::default()
        }
    }

    fn element(id: &str) -> AnimationOptions {
        AnimationOptions { id: Param::Set(id.to_string()), ..Default::default() }
    }

    #[tokio::test]
    async fn test_unmatched_entries_are_dropped() {
        let harness = Harness::new();
        harness.views.add_elements("from", &["avatar", "title"]);
        harness.views.add_elements("to", &["hero", "body"]);
        let from = harness.component("from", "List");
        let to = harness.component("to", "Detail");
        from.on_view_will_appear();
        from.on_view_did_appear();

        let set = TransitionSetCreator::default()
            .create(
                from.as_ref(),
                to.as_ref(),
                &[shared("avatar", "hero"), shared("avatar", "missing"), shared("missing", "hero")],
                &[element("title"), element("body"), element("nowhere"), AnimationOptions::default()],
            )
            .await;

        assert_eq!(set.shared_elements.len(), 1);
        assert_eq!(set.shared_elements[0].to.as_ref().map(|e| e.screen_id.as_str()), Some("to"));
        let screens: Vec<_> = set
            .elements
            .iter()
            .filter_map(|e| e.element.as_ref().map(|e| e.screen_id.clone()))
            .collect();
        assert_eq!(screens, vec!["from".to_string(), "to".to_string()]);
        assert_eq!(set.size(), 3);
    }

    #[tokio::test]
    async fn test_single_screen_set() {
        let harness = Harness::new();
        harness.views.add_elements("root", &["logo", "banner"]);
        let screen = harness.component("root", "Home");

        let set = TransitionSetCreator::default()
            .create_for_screen(
                screen.as_ref(),
                &[shared("logo", "banner"), shared("logo", "missing")],
                &[element("logo"), element("missing")],
            )
            .await;

        assert_eq!(set.elements.len(), 1);
        assert_eq!(set.shared_elements.len(), 1);
        assert_eq!(set.shared_elements[0].from.as_ref().map(|e| e.screen_id.as_str()), Some("root"));
        assert_eq!(set.size(), 2);
    }
}
