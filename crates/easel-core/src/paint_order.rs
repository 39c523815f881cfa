//! Paint-order resolution shared by both backends.
//!
//! [`resolve_paint_order`] turns the element map into two ordered passes:
//! ordinary elements in array order, then embedded web content on top. Text
//! bound to a container is not given its own slot; it travels with its
//! container in [`PaintItem::bound_text`]. A container carries at most one
//! label: the first bound text in array order. Later texts bound to the same
//! container are not painted. For every item the resolver also
//! decides the effective containing frame and whether that frame clips the
//! element, so the preview and the export never disagree on either.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::{
    config::RenderConfig,
    element::{Element, ElementMap},
    identifier::Id,
    transform::{bound_container, element_bounds},
};

/// One element to paint, with everything the backends need to place it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintItem<'a> {
    pub element: &'a Element,
    /// Text bound to `element`, painted right after it.
    pub bound_text: Option<&'a Element>,
    /// The frame the element belongs to for this paint.
    pub frame: Option<&'a Element>,
    /// True when `frame` clips the element.
    pub clip: bool,
}

/// The two ordered passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaintOrder<'a> {
    /// Ordinary elements.
    pub standard: Vec<PaintItem<'a>>,
    /// Externally embedded content, always above `standard`.
    pub on_top: Vec<PaintItem<'a>>,
}

impl<'a> PaintOrder<'a> {
    /// Both passes in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &PaintItem<'a>> {
        self.standard.iter().chain(self.on_top.iter())
    }

    pub fn len(&self) -> usize {
        self.standard.len() + self.on_top.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves the paint passes for `elements` under `config`.
///
/// # Examples
///
/// ```
/// use easel_core::config::RenderConfig;
/// use easel_core::element::{Element, ElementKind, ElementMap};
/// use easel_core::paint_order::resolve_paint_order;
///
/// let embed = Element::new("web", ElementKind::Embeddable, 0.0, 0.0, 10.0, 10.0);
/// let rect = Element::new("r", ElementKind::Rectangle, 0.0, 0.0, 10.0, 10.0);
/// let map: ElementMap = [embed, rect].into_iter().map(|e| (e.id(), e)).collect();
///
/// let order = resolve_paint_order(&map, &RenderConfig::default());
/// let ids: Vec<String> = order.iter().map(|item| item.element.id().to_string()).collect();
/// assert_eq!(ids, ["r", "web"]);
/// ```
pub fn resolve_paint_order<'a>(elements: &'a ElementMap, config: &RenderConfig) -> PaintOrder<'a> {
    let bound_texts = collect_bound_texts(elements);
    let group_frames = collect_group_frames(elements);

    let mut order = PaintOrder::default();
    for element in elements.values() {
        if element.is_deleted() || bound_container(element, elements).is_some() {
            continue;
        }

        let frame = effective_frame(element, elements, config);
        let clip = frame.is_some_and(|frame| should_clip(element, frame, elements, &group_frames, config));
        let item = PaintItem {
            element,
            bound_text: bound_texts.get(&element.id()).copied(),
            frame,
            clip,
        };

        if element.is_embeddable() {
            order.on_top.push(item);
        } else {
            order.standard.push(item);
        }
    }

    debug!(
        standard = order.standard.len(),
        on_top = order.on_top.len();
        "Resolved paint order"
    );
    order
}

/// First live text bound to each container, keyed by container id.
fn collect_bound_texts(elements: &ElementMap) -> HashMap<Id, &Element> {
    let mut texts: HashMap<Id, &Element> = HashMap::new();
    for element in elements.values().filter(|e| !e.is_deleted()) {
        let Some(container) = element.container_id().filter(|id| elements.contains_key(id)) else {
            continue;
        };
        match texts.get(&container) {
            Some(label) => trace!(
                element_id:% = element.id(),
                container_id:% = container,
                label_id:% = label.id();
                "Container already has a label, skipping extra bound text"
            ),
            None => {
                texts.insert(container, element);
            }
        }
    }
    texts
}

/// Frames that members of each group belong to.
fn collect_group_frames(elements: &ElementMap) -> HashMap<Id, HashSet<Id>> {
    let mut groups: HashMap<Id, HashSet<Id>> = HashMap::new();
    for element in elements.values() {
        if let Some(frame_id) = element.frame_id() {
            for group in element.group_ids() {
                groups.entry(*group).or_default().insert(frame_id);
            }
        }
    }
    groups
}

/// The element's explicit frame, or the highlighted frame while the element is
/// being dragged into it.
fn effective_frame<'a>(
    element: &Element,
    elements: &'a ElementMap,
    config: &RenderConfig,
) -> Option<&'a Element> {
    if element.is_frame() {
        return None;
    }
    let frame_id = element.frame_id().or_else(|| {
        config
            .interaction
            .frame_to_highlight
            .filter(|_| config.interaction.is_dragging(element.id()))
    })?;
    elements.get(&frame_id).filter(|frame| frame.is_frame())
}

fn should_clip(
    element: &Element,
    frame: &Element,
    elements: &ElementMap,
    group_frames: &HashMap<Id, HashSet<Id>>,
    config: &RenderConfig,
) -> bool {
    if !config.clips_frames() {
        return false;
    }
    // Elements on their way into the highlighted frame stay whole while dragged.
    let highlighted = config.interaction.frame_to_highlight == Some(frame.id());
    if highlighted && config.interaction.is_dragging(element.id()) {
        return false;
    }

    let element_box = element_bounds(element, elements);
    let frame_box = element_bounds(frame, elements);
    if element_box.intersects(&frame_box) || element_box.contains(&frame_box) {
        return true;
    }

    element.group_ids().iter().any(|group| {
        group_frames
            .get(group)
            .is_some_and(|frames| frames.contains(&frame.id()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, FrameData, LinearData, TextData};
    use crate::geometry::Point;

    fn map_of(elements: Vec<Element>) -> ElementMap {
        elements.into_iter().map(|e| (e.id(), e)).collect()
    }

    fn ids(items: &[PaintItem<'_>]) -> Vec<String> {
        items.iter().map(|i| i.element.id().to_string()).collect()
    }

    fn frame(id: &str) -> Element {
        Element::new(id, ElementKind::Frame(FrameData::default()), 0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_embeds_paint_after_everything() {
        let map = map_of(vec![
            Element::new("embed", ElementKind::Embeddable, 0.0, 0.0, 10.0, 10.0),
            Element::new("a", ElementKind::Rectangle, 0.0, 0.0, 10.0, 10.0),
            Element::new("b", ElementKind::Ellipse, 0.0, 0.0, 10.0, 10.0),
        ]);
        let order = resolve_paint_order(&map, &RenderConfig::default());
        assert_eq!(ids(&order.standard), ["a", "b"]);
        assert_eq!(ids(&order.on_top), ["embed"]);
    }

    #[test]
    fn test_bound_text_travels_with_container() {
        let arrow = Element::new(
            "arrow",
            ElementKind::Arrow(LinearData::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)])),
            0.0,
            0.0,
            10.0,
            0.0,
        );
        let label = Element::new(
            "label",
            ElementKind::Text(TextData::new("x").with_container(Id::new("arrow"))),
            0.0,
            0.0,
            5.0,
            5.0,
        );
        let map = map_of(vec![label, arrow]);
        let order = resolve_paint_order(&map, &RenderConfig::default());

        assert_eq!(ids(&order.standard), ["arrow"]);
        assert_eq!(order.standard[0].bound_text.map(|t| t.id()), Some(Id::new("label")));
    }

    #[test]
    fn test_container_keeps_first_label_only() {
        let label = |id: &str| {
            Element::new(
                id,
                ElementKind::Text(TextData::new(id).with_container(Id::new("box"))),
                0.0,
                0.0,
                5.0,
                5.0,
            )
        };
        let rect = Element::new("box", ElementKind::Rectangle, 0.0, 0.0, 10.0, 10.0);
        let map = map_of(vec![rect, label("first"), label("second")]);
        let order = resolve_paint_order(&map, &RenderConfig::default());

        assert_eq!(ids(&order.standard), ["box"]);
        assert_eq!(order.standard[0].bound_text.map(|t| t.id()), Some(Id::new("first")));
    }

    #[test]
    fn test_orphan_bound_text_is_painted_alone() {
        let label = Element::new(
            "label",
            ElementKind::Text(TextData::new("x").with_container(Id::new("gone"))),
            0.0,
            0.0,
            5.0,
            5.0,
        );
        let map = map_of(vec![label]);
        let order = resolve_paint_order(&map, &RenderConfig::default());
        assert_eq!(ids(&order.standard), ["label"]);
    }

    #[test]
    fn test_frame_clip_for_overlapping_child() {
        let map = map_of(vec![
            frame("f"),
            Element::new("inside", ElementKind::Rectangle, 90.0, 90.0, 20.0, 20.0).with_frame_id("f"),
            Element::new("away", ElementKind::Rectangle, 500.0, 500.0, 20.0, 20.0).with_frame_id("f"),
        ]);
        let order = resolve_paint_order(&map, &RenderConfig::default());

        let inside = &order.standard[1];
        assert_eq!(inside.frame.map(|f| f.id()), Some(Id::new("f")));
        assert!(inside.clip);
        let away = &order.standard[2];
        assert!(!away.clip);
        assert!(order.standard[0].frame.is_none());
    }

    #[test]
    fn test_grouped_element_outside_frame_is_clipped() {
        let map = map_of(vec![
            frame("f"),
            Element::new("in", ElementKind::Rectangle, 10.0, 10.0, 5.0, 5.0)
                .with_frame_id("f")
                .with_group_ids(&["g"]),
            Element::new("out", ElementKind::Rectangle, 500.0, 500.0, 5.0, 5.0)
                .with_frame_id("f")
                .with_group_ids(&["g"]),
        ]);
        let order = resolve_paint_order(&map, &RenderConfig::default());
        assert!(order.standard[2].clip);
    }

    #[test]
    fn test_clip_disabled_by_config() {
        let map = map_of(vec![
            frame("f"),
            Element::new("c", ElementKind::Rectangle, 10.0, 10.0, 5.0, 5.0).with_frame_id("f"),
        ]);
        let mut config = RenderConfig::default();
        config.frame_rendering.clip = false;
        let order = resolve_paint_order(&map, &config);
        assert!(!order.standard[1].clip);
        assert!(order.standard[1].frame.is_some());
    }

    #[test]
    fn test_dragged_element_targets_highlighted_frame_without_clip() {
        let map = map_of(vec![
            frame("f"),
            Element::new("dragged", ElementKind::Rectangle, 90.0, 90.0, 20.0, 20.0),
        ]);
        let mut config = RenderConfig::default();
        config.interaction.selected.insert(Id::new("dragged"));
        config.interaction.frame_to_highlight = Some(Id::new("f"));
        config.interaction.dragging = true;

        let order = resolve_paint_order(&map, &config);
        let item = &order.standard[1];
        assert_eq!(item.frame.map(|f| f.id()), Some(Id::new("f")));
        assert!(!item.clip);

        config.interaction.dragging = false;
        let order = resolve_paint_order(&map, &config);
        assert!(order.standard[1].frame.is_none());
    }

    #[test]
    fn test_deleted_elements_are_skipped() {
        let map = map_of(vec![
            Element::new("gone", ElementKind::Rectangle, 0.0, 0.0, 1.0, 1.0).with_deleted(true),
            Element::new("kept", ElementKind::Rectangle, 0.0, 0.0, 1.0, 1.0),
        ]);
        let order = resolve_paint_order(&map, &RenderConfig::default());
        assert_eq!(ids(&order.standard), ["kept"]);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::element::{ElementKind, FrameData};

    fn element_strategy() -> impl Strategy<Value = Element> {
        (
            0usize..40,
            0u8..4,
            -200.0f64..200.0,
            -200.0f64..200.0,
            prop::option::of(0usize..3),
        )
            .prop_map(|(n, kind, x, y, frame)| {
                let kind = match kind {
                    0 => ElementKind::Rectangle,
                    1 => ElementKind::Ellipse,
                    2 => ElementKind::Embeddable,
                    _ => ElementKind::Diamond,
                };
                let element = Element::new(&format!("e{n}"), kind, x, y, 30.0, 30.0);
                match frame {
                    Some(f) => element.with_frame_id(&format!("frame{f}")),
                    None => element,
                }
            })
    }

    fn scene_strategy() -> impl Strategy<Value = ElementMap> {
        prop::collection::vec(element_strategy(), 0..30).prop_map(|elements| {
            let frames = (0..3).map(|f| {
                Element::new(
                    &format!("frame{f}"),
                    ElementKind::Frame(FrameData::default()),
                    f as f64 * 100.0,
                    0.0,
                    100.0,
                    100.0,
                )
            });
            frames
                .chain(elements)
                .map(|e| (e.id(), e))
                .collect()
        })
    }

    /// Resolving twice yields the same passes.
    fn check_resolution_is_idempotent(map: &ElementMap) -> Result<(), TestCaseError> {
        let config = RenderConfig::default();
        let first = resolve_paint_order(map, &config);
        let second = resolve_paint_order(map, &config);
        prop_assert_eq!(format!("{first:?}"), format!("{second:?}"));
        Ok(())
    }

    /// Embeds are only ever in the second pass, and everything else keeps array order.
    fn check_passes_partition_elements(map: &ElementMap) -> Result<(), TestCaseError> {
        let order = resolve_paint_order(map, &RenderConfig::default());
        prop_assert!(order.standard.iter().all(|i| !i.element.is_embeddable()));
        prop_assert!(order.on_top.iter().all(|i| i.element.is_embeddable()));
        prop_assert_eq!(order.len(), map.len());

        let positions: Vec<usize> = order
            .standard
            .iter()
            .filter_map(|i| map.get_index_of(&i.element.id()))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        Ok(())
    }

    proptest! {
        #[test]
        fn resolution_is_idempotent(map in scene_strategy()) {
            check_resolution_is_idempotent(&map)?;
        }

        #[test]
        fn passes_partition_elements(map in scene_strategy()) {
            check_passes_partition_elements(&map)?;
        }
    }
}
