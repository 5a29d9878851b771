//! Rect measurement
//!
//! Wraps the host's bounding-box query and turns it into immutable [`Rect`]
//! snapshots. Elements hidden with `display: none` report an empty box, so
//! they are measured through a *sneak peek*: the element is made measurable
//! but fully transparent for the duration of the query and its prior style
//! is restored before `measure` returns.

use perch_core::Rect;

use crate::surface::{ElementBox, PeekStyle, Surface};

/// Temporarily forces an element into the measurable-but-invisible state
///
/// The prior style is restored on drop, so early returns cannot leave the
/// element visible.
struct SneakPeek<'a, S: Surface> {
    surface: &'a mut S,
    handle: S::Handle,
    prior: PeekStyle,
}

impl<'a, S: Surface> SneakPeek<'a, S> {
    fn begin(surface: &'a mut S, handle: S::Handle, prior: PeekStyle) -> Self {
        surface.set_peek_style(handle, PeekStyle::PEEK);
        Self {
            surface,
            handle,
            prior,
        }
    }

    fn element_box(&mut self) -> Option<ElementBox> {
        self.surface.element_box(self.handle)
    }
}

impl<S: Surface> Drop for SneakPeek<'_, S> {
    fn drop(&mut self) {
        self.surface.set_peek_style(self.handle, self.prior);
    }
}

/// Measure an element
///
/// - `None` yields [`Rect::ZERO`] (no activator bound).
/// - A detached element yields [`Rect::ZERO`] and a warning.
/// - A hidden element is measured through a sneak peek.
pub fn measure<S: Surface>(surface: &mut S, handle: Option<S::Handle>) -> Rect {
    let Some(handle) = handle else {
        return Rect::ZERO;
    };

    let element = match surface.peek_style(handle) {
        Some(style) if style.is_hidden() => {
            tracing::debug!("measure: sneak peek on hidden element {:?}", handle);
            let mut peek = SneakPeek::begin(surface, handle, style);
            peek.element_box()
        }
        Some(_) => surface.element_box(handle),
        None => None,
    };

    match element {
        Some(element) => rect_from_element(element),
        None => {
            tracing::warn!(
                "measure: element {:?} is detached, using a zero rect",
                handle
            );
            Rect::ZERO
        }
    }
}

fn rect_from_element(element: ElementBox) -> Rect {
    Rect::from_bounds(element.bounds)
        .with_offset_top(element.offset_top)
        .with_scroll_height(element.scroll_height.max(element.bounds.height))
}
