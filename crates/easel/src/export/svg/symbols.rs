//! Bitmap symbols and their instances.
//!
//! Each source bitmap is written once as a `<symbol>` whose view box is the
//! bitmap's natural pixel size. Every image element then instantiates it with
//! a `<use>` stretched to the element's uncropped size and, when cropped, masks
//! the instance down to the visible region. Repeated and differently cropped
//! instances of one file therefore share a single copy of the pixel data.

use indexmap::IndexMap;
use log::{debug, trace};
use svg::node::element as svg_element;

use easel_core::{
    element::{BinaryFile, Element, ImageData},
    geometry::{Point, Size},
    identifier::Id,
    transform::fmt_num,
};

use super::{
    SvgNode,
    document::{DocumentDefs, ExportContext},
};

#[derive(Debug)]
struct SymbolEntry {
    id: String,
    natural: Size,
    data_url: String,
}

/// Symbols defined in one document, keyed by file id.
#[derive(Debug, Default)]
pub(super) struct SymbolTable {
    entries: IndexMap<Id, SymbolEntry>,
    /// Symbols defined without reuse, one per instance.
    unshared: Vec<SymbolEntry>,
}

impl SymbolTable {
    /// Id of the symbol for `file`, defining it on first use.
    ///
    /// With `reuse == false` every call defines a new symbol.
    pub fn symbol_for(&mut self, file: &BinaryFile, natural: Size, reuse: bool) -> String {
        if !reuse {
            let id = format!("image-{}-{}", file.id.to_svg_id(), self.unshared.len() + 1);
            self.unshared.push(SymbolEntry {
                id: id.clone(),
                natural,
                data_url: file.data_url.clone(),
            });
            return id;
        }
        if let Some(entry) = self.entries.get(&file.id) {
            trace!(file_id:% = file.id; "Reusing image symbol");
            return entry.id.clone();
        }
        let id = format!("image-{}", file.id.to_svg_id());
        self.entries.insert(
            file.id,
            SymbolEntry {
                id: id.clone(),
                natural,
                data_url: file.data_url.clone(),
            },
        );
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len() + self.unshared.len()
    }

    pub fn into_symbols(self) -> Vec<svg_element::Symbol> {
        self.entries
            .into_values()
            .chain(self.unshared)
            .map(|entry| {
                let image = svg_element::Image::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("href", entry.data_url);
                svg_element::Symbol::new()
                    .set("id", entry.id)
                    .set(
                        "viewBox",
                        format!(
                            "0 0 {} {}",
                            fmt_num(entry.natural.width()),
                            fmt_num(entry.natural.height())
                        ),
                    )
                    .set("preserveAspectRatio", "none")
                    .add(image)
            })
            .collect()
    }
}

/// Natural pixel size of the source behind `data`.
fn natural_size(element: &Element, data: &ImageData, file: &BinaryFile) -> Size {
    if let Some(crop) = data.crop.filter(|c| c.natural_width > 0.0 && c.natural_height > 0.0) {
        return Size::new(crop.natural_width, crop.natural_height);
    }
    match &file.bitmap {
        Some(bitmap) => Size::new(f64::from(bitmap.width()), f64::from(bitmap.height())),
        None => element.size(),
    }
}

/// The `<use>` instance of an image element, or `None` if its file is missing.
pub(super) fn image_node(
    element: &Element,
    data: &ImageData,
    ctx: &ExportContext<'_>,
    defs: &mut DocumentDefs,
    reuse: bool,
) -> Option<SvgNode> {
    let file = data
        .file_id
        .and_then(|id| ctx.files.get(&id))
        .filter(|file| !file.data_url.is_empty());
    let Some(file) = file else {
        trace!(element_id:% = element.id(); "Image file missing, skipping");
        return None;
    };

    let natural = natural_size(element, data, file);
    let symbol_id = defs.symbols.symbol_for(file, natural, reuse);
    let rect = element.rect();

    // uncropped size and the instance origin that puts the crop on the element
    let crop = data.crop.filter(|c| c.width > 0.0 && c.height > 0.0);
    let (uncropped, origin) = match crop {
        Some(crop) => {
            let uncropped = Size::new(
                rect.width() * natural.width() / crop.width,
                rect.height() * natural.height() / crop.height,
            );
            let origin = Point::new(
                rect.min_x() - crop.x * uncropped.width() / natural.width(),
                rect.min_y() - crop.y * uncropped.height() / natural.height(),
            );
            (uncropped, origin)
        }
        None => (rect.to_size(), rect.min_point()),
    };
    debug!(
        element_id:% = element.id(),
        symbol = symbol_id,
        fingerprint = format!("{}x{}", fmt_num(uncropped.width()), fmt_num(uncropped.height()));
        "Instantiating image symbol"
    );

    let mut instance = svg_element::Use::new()
        .set("href", format!("#{symbol_id}"))
        .set("x", origin.x())
        .set("y", origin.y())
        .set("width", uncropped.width())
        .set("height", uncropped.height());
    if data.is_mirrored() {
        let center = rect.center();
        instance = instance.set(
            "transform",
            format!(
                "translate({cx} {cy}) scale({sx} {sy}) translate(-{cx} -{cy})",
                cx = fmt_num(center.x()),
                cy = fmt_num(center.y()),
                sx = fmt_num(data.scale[0].signum()),
                sy = fmt_num(data.scale[1].signum()),
            ),
        );
    }

    if crop.is_none() {
        return Some(Box::new(instance));
    }
    let mask_id = defs.next_id("image-crop");
    let visible = svg_element::Rectangle::new()
        .set("x", rect.min_x())
        .set("y", rect.min_y())
        .set("width", rect.width())
        .set("height", rect.height())
        .set("fill", "#ffffff");
    defs.add(
        svg_element::Mask::new()
            .set("id", mask_id.as_str())
            .set("maskUnits", "userSpaceOnUse")
            .add(visible),
    );
    Some(Box::new(
        svg_element::Group::new()
            .set("mask", format!("url(#{mask_id})"))
            .add(instance),
    ))
}

#[cfg(test)]
mod tests {
    use easel_core::element::Bitmap;

    use super::*;

    fn file(id: &str) -> BinaryFile {
        BinaryFile {
            id: Id::new(id),
            mime_type: "image/png".to_string(),
            data_url: "data:image/png;base64,AA==".to_string(),
            bitmap: Bitmap::new(4, 2, vec![0; 32]),
        }
    }

    #[test]
    fn test_symbol_shared_per_file() {
        let mut table = SymbolTable::default();
        let a = table.symbol_for(&file("f"), Size::new(4.0, 2.0), true);
        let b = table.symbol_for(&file("f"), Size::new(4.0, 2.0), true);
        let c = table.symbol_for(&file("g"), Size::new(4.0, 2.0), true);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_symbol_not_shared_without_reuse() {
        let mut table = SymbolTable::default();
        let a = table.symbol_for(&file("f"), Size::new(4.0, 2.0), false);
        let b = table.symbol_for(&file("f"), Size::new(4.0, 2.0), false);
        assert_ne!(a, b);
        assert_eq!(table.into_symbols().len(), 2);
    }

    #[test]
    fn test_symbol_view_box_is_natural_size() {
        let mut table = SymbolTable::default();
        table.symbol_for(&file("f"), Size::new(400.0, 200.0), true);
        let symbol = table.into_symbols().remove(0).to_string();
        assert!(symbol.contains(r#"viewBox="0 0 400 200""#), "{symbol}");
        assert!(symbol.contains(r#"preserveAspectRatio="none""#));
    }
}
