//! Element and shared-element transition matching
//!
//! For every declared element transition and shared element pair, the
//! [`TransitionSetCreator`] locates the participating views on the source and
//! destination screens. Lookups run concurrently on the UI task; entries
//! whose views could not all be located are dropped without error.

mod creator;
mod finder;

pub use creator::TransitionSetCreator;
pub use finder::{ExistingViewFinder, OptimisticViewFinder, ViewFinder};

use nav_options::{AnimationOptions, SharedElementTransitionOptions};

use crate::view::ElementRef;

/// Animation of a single element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTransition {
    /// Declared animation
    pub options: AnimationOptions,
    /// Located element
    pub element: Option<ElementRef>,
}

impl ElementTransition {
    /// Valid once the element was located
    pub fn is_valid(&self) -> bool {
        self.element.is_some()
    }
}

/// A view animated from the source screen to the destination screen
#[derive(Debug, Clone, PartialEq)]
pub struct SharedElementTransition {
    /// Declared pair
    pub options: SharedElementTransitionOptions,
    /// Located element on the source screen
    pub from: Option<ElementRef>,
    /// Located element on the destination screen
    pub to: Option<ElementRef>,
}

impl SharedElementTransition {
    /// Valid once both ends were located
    pub fn is_valid(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

/// Valid transitions of one navigation operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionSet {
    /// Shared element transitions
    pub shared_elements: Vec<SharedElementTransition>,
    /// Element transitions
    pub elements: Vec<ElementTransition>,
}

impl TransitionSet {
    /// Whether nothing was matched
    pub fn is_empty(&self) -> bool {
        self.shared_elements.is_empty() && self.elements.is_empty()
    }

    /// Number of matched transitions
    pub fn size(&self) -> usize {
        self.shared_elements.len() + self.elements.len()
    }
}
