//! Element lookup strategies

use async_trait::async_trait;

use crate::controller::ViewController;
use crate::view::ElementRef;

/// Locates an element in a screen's view hierarchy
#[async_trait(?Send)]
pub trait ViewFinder {
    /// Find `element_id` on `screen`
    async fn find(&self, screen: &dyn ViewController, element_id: &str) -> Option<ElementRef>;
}

fn lookup(screen: &dyn ViewController, element_id: &str) -> Option<ElementRef> {
    let found = screen.base().with_view(|view| view.has_element(element_id)).unwrap_or(false);
    found.then(|| ElementRef { element_id: element_id.to_string(), screen_id: screen.id().to_string() })
}

/// Finds elements of screens that are already shown
#[derive(Debug, Default, Clone, Copy)]
pub struct ExistingViewFinder;

#[async_trait(?Send)]
impl ViewFinder for ExistingViewFinder {
    async fn find(&self, screen: &dyn ViewController, element_id: &str) -> Option<ElementRef> {
        if !screen.is_visible() {
            return None;
        }
        lookup(screen, element_id)
    }
}

/// Finds elements of screens that are about to be laid out
///
/// Yields to the UI task once before looking, then creates the screen's view
/// if needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimisticViewFinder;

#[async_trait(?Send)]
impl ViewFinder for OptimisticViewFinder {
    async fn find(&self, screen: &dyn ViewController, element_id: &str) -> Option<ElementRef> {
        tokio::task::yield_now().await;
        if screen.base().lifecycle().is_destroyed() {
            return None;
        }
        screen.ensure_view_created();
        lookup(screen, element_id)
    }
}
