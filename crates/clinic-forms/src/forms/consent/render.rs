use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::domain::ConsentFormSubmission;
use super::layout::{ConsentLayout, FieldPlacement};

/// Resource name the overlay font is registered under on each touched page.
pub(crate) const FONT_RESOURCE: &str = "ClinicHelv";

/// Parent chains deeper than this are treated as malformed.
const MAX_PAGE_TREE_DEPTH: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template is not a readable PDF: {0}")]
    Parse(String),
    #[error("layout places text on page {page} but the template has {available} page(s)")]
    MissingPage { page: usize, available: usize },
    #[error("unable to write the filled PDF: {0}")]
    Write(String),
}

/// The filled consent form, ready to attach.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl std::fmt::Debug for RenderedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedDocument")
            .field("filename", &self.filename)
            .field("bytes", &self.bytes.len())
            .field("page_count", &self.page_count)
            .finish()
    }
}

/// Draws submission values onto the template at the layout's fixed positions.
#[derive(Debug, Clone, Default)]
pub struct ConsentPdfRenderer {
    layout: ConsentLayout,
}

impl ConsentPdfRenderer {
    pub fn new(layout: ConsentLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ConsentLayout {
        &self.layout
    }

    pub fn render(
        &self,
        template: &[u8],
        submission: &ConsentFormSubmission,
    ) -> Result<RenderedDocument, RenderError> {
        let mut doc = Document::load_mem(template).map_err(parse_error)?;
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

        let last_page = self.layout.last_page();
        if last_page >= pages.len() {
            return Err(RenderError::MissingPage {
                page: last_page + 1,
                available: pages.len(),
            });
        }

        let mut overlays: Vec<Vec<Operation>> = vec![Vec::new(); pages.len()];

        for (field, placement) in &self.layout.fields {
            draw(&mut overlays, placement, &field.value(submission));
        }

        let table = &self.layout.medications;
        for (index, medication) in submission.medications.iter().enumerate() {
            let y = table.row_y(index);
            let ops = &mut overlays[table.page];
            push_text(ops, table.name_x, y, table.font_size, medication.name.trim());
            push_text(ops, table.dosage_x, y, table.font_size, medication.dosage.trim());
        }

        if submission.non_consent {
            draw(
                &mut overlays,
                &self.layout.non_consent,
                &self.layout.non_consent_text,
            );
        }

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        for (page_id, operations) in pages.iter().zip(overlays) {
            if operations.is_empty() {
                continue;
            }
            register_font(&mut doc, *page_id, font_id).map_err(parse_error)?;
            overlay_page(&mut doc, *page_id, operations)?;
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|err| RenderError::Write(err.to_string()))?;

        Ok(RenderedDocument {
            filename: submission.attachment_name(),
            bytes,
            page_count: pages.len(),
        })
    }
}

fn draw(overlays: &mut [Vec<Operation>], placement: &FieldPlacement, text: &str) {
    push_text(
        &mut overlays[placement.page],
        placement.x,
        placement.y,
        placement.font_size,
        text,
    );
}

/// Blank values draw nothing.
fn push_text(ops: &mut Vec<Operation>, x: f32, y: f32, font_size: f32, text: &str) {
    let encoded = encode_win_ansi(text);
    if encoded.is_empty() {
        return;
    }

    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![
            Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
            Object::Real(font_size),
        ],
    ));
    ops.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encoded, StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

/// Maps text onto the single-byte WinAnsi encoding of the standard Helvetica font.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if c.is_whitespace() || c.is_control() => b' ',
            _ => b'?',
        })
        .collect()
}

/// Appends the overlay after the page's own content, isolating the original
/// content's graphics state with `q`/`Q`.
fn overlay_page(
    doc: &mut Document,
    page_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<(), RenderError> {
    let mut ops = Vec::with_capacity(operations.len() + 1);
    ops.push(Operation::new("g", vec![Object::Integer(0)]));
    ops.extend(operations);

    let overlay = Content { operations: ops }
        .encode()
        .map_err(|err| RenderError::Write(err.to_string()))?;

    let existing = {
        let page = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(parse_error)?;
        match page.get(b"Contents") {
            Ok(Object::Array(items)) => items.clone(),
            Ok(Object::Reference(id)) => match doc.get_object(*id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            _ => Vec::new(),
        }
    };

    let mut contents = Vec::with_capacity(existing.len() + 3);
    if !existing.is_empty() {
        let save = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let restore = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
        contents.push(Object::Reference(save));
        contents.extend(existing);
        contents.push(Object::Reference(restore));
    }
    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay));
    contents.push(Object::Reference(overlay_id));

    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(parse_error)?
        .set("Contents", Object::Array(contents));
    Ok(())
}

enum FontTable {
    Inline,
    Shared(ObjectId),
    Missing,
}

fn register_font(doc: &mut Document, page_id: ObjectId, font_id: ObjectId) -> lopdf::Result<()> {
    adopt_inherited_resources(doc, page_id)?;

    let table = {
        let resources = doc
            .get_or_create_resources(page_id)
            .and_then(Object::as_dict_mut)?;
        match resources.get(b"Font") {
            Ok(Object::Reference(id)) => FontTable::Shared(*id),
            Ok(Object::Dictionary(_)) => FontTable::Inline,
            _ => FontTable::Missing,
        }
    };

    let fonts = match table {
        FontTable::Shared(id) => doc.get_object_mut(id).and_then(Object::as_dict_mut)?,
        FontTable::Inline => doc
            .get_or_create_resources(page_id)
            .and_then(Object::as_dict_mut)?
            .get_mut(b"Font")
            .and_then(Object::as_dict_mut)?,
        FontTable::Missing => {
            let resources = doc
                .get_or_create_resources(page_id)
                .and_then(Object::as_dict_mut)?;
            resources.set("Font", Dictionary::new());
            resources.get_mut(b"Font").and_then(Object::as_dict_mut)?
        }
    };

    fonts.set(FONT_RESOURCE, Object::Reference(font_id));
    Ok(())
}

/// Copies the nearest ancestor's `/Resources` onto the page so adding the
/// overlay font does not hide the resources the page inherited.
fn adopt_inherited_resources(doc: &mut Document, page_id: ObjectId) -> lopdf::Result<()> {
    let inherited = {
        let page = doc.get_object(page_id).and_then(Object::as_dict)?;
        if page.has(b"Resources") {
            return Ok(());
        }

        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        let mut inherited = None;
        let mut depth = 0;
        while let Some(id) = parent {
            if depth >= MAX_PAGE_TREE_DEPTH {
                break;
            }
            let node = doc.get_object(id).and_then(Object::as_dict)?;
            if let Ok(resources) = node.get(b"Resources") {
                inherited = Some(resources.clone());
                break;
            }
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
            depth += 1;
        }
        inherited
    };

    if let Some(resources) = inherited {
        doc.get_object_mut(page_id)
            .and_then(Object::as_dict_mut)?
            .set("Resources", resources);
    }
    Ok(())
}

fn parse_error(err: lopdf::Error) -> RenderError {
    RenderError::Parse(err.to_string())
}
