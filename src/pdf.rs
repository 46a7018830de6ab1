use std::io::BufWriter;

use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::*;

use crate::error::{PassbookError, Result};
use crate::fmt::{amount, amount_in_words, amount_or_dash, display_date, display_opt_date, or_dash};
use crate::ledger::LedgerView;
use crate::paginate::{fit_single_page, raster_crops, PageLayout, Placement, A4_HEIGHT, A4_WIDTH};
use crate::scope::StatementScope;

// A4 portrait (mm)
const PAGE_W: f32 = A4_WIDTH as f32;
const PAGE_H: f32 = A4_HEIGHT as f32;
const MARGIN_TOP: f32 = 15.0;
const MARGIN_BOTTOM: f32 = 15.0;
const MARGIN_LEFT: f32 = 10.0;
const MARGIN_RIGHT: f32 = 10.0;
const ROW_H: f32 = 5.0;
const FONT_SIZE: f32 = 9.0;
const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 10.0;
const MM_PER_INCH: f64 = 25.4;

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.18
}

/// Shorten `text` so it fits in `width` mm, ending with "..." when cut.
fn clip(text: &str, width: f32, size: f32) -> String {
    if approx_text_width(text, size) <= width {
        return text.to_string();
    }
    let max_chars = ((width / (size * 0.18)) as usize).saturating_sub(3);
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Col {
    width: f32,
    align: Align,
}

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PassbookError::Pdf(format!("{e:?}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PassbookError::Pdf(format!("{e:?}")))?;
        Ok(Self {
            doc,
            font,
            font_bold,
            current_page: page,
            current_layer: layer,
            y: MARGIN_TOP,
        })
    }

    fn pdf_y(&self) -> f32 {
        PAGE_H - self.y
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc
            .get_page(self.current_page)
            .get_layer(self.current_layer)
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer");
        self.current_page = page;
        self.current_layer = layer;
        self.y = MARGIN_TOP;
    }

    /// Returns true when a page break happened.
    fn ensure_space(&mut self, needed: f32) -> bool {
        if self.y + needed > PAGE_H - MARGIN_BOTTOM {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn text(&self, s: &str, x: f32, size: f32, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        self.layer().use_text(s, size, Mm(x), Mm(self.pdf_y()), font);
    }

    fn hline(&self, x1: f32, x2: f32) {
        let layer = self.layer();
        layer.set_outline_thickness(0.5);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(self.pdf_y())), false),
                (Point::new(Mm(x2), Mm(self.pdf_y())), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }

    fn header(&mut self, title: &str, company: &str, heading: &str, date_range: &str) {
        self.text(title, MARGIN_LEFT, TITLE_SIZE, true);
        self.y += 7.0;
        if !company.is_empty() {
            self.text(company, MARGIN_LEFT, SUBTITLE_SIZE, false);
            self.y += 5.0;
        }
        self.text(heading, MARGIN_LEFT, SUBTITLE_SIZE, true);
        self.y += 5.0;
        self.text(date_range, MARGIN_LEFT, SUBTITLE_SIZE, false);
        self.y += 5.0;
        let ts = chrono::Local::now()
            .format("Generated %d-%m-%Y %H:%M")
            .to_string();
        self.text(&ts, MARGIN_LEFT, 8.0, false);
        self.y += 5.0;
        self.hline(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT);
        self.y += 5.0;
    }

    fn cells(&mut self, cols: &[Col], values: &[&str], bold: bool) {
        let mut x = MARGIN_LEFT;
        for (col, value) in cols.iter().zip(values) {
            let value = clip(value, col.width - 1.0, FONT_SIZE);
            match col.align {
                Align::Left => self.text(&value, x, FONT_SIZE, bold),
                Align::Right => {
                    let tw = approx_text_width(&value, FONT_SIZE);
                    self.text(&value, x + col.width - tw, FONT_SIZE, bold);
                }
            }
            x += col.width;
        }
        self.y += ROW_H;
    }

    fn table_header(&mut self, cols: &[Col], headers: &[&str]) {
        self.ensure_space(ROW_H * 2.0);
        self.cells(cols, headers, true);
        self.hline(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT);
        self.y += 2.0;
    }

    /// A body row; the header is repeated at the top of every continuation page.
    fn table_row(&mut self, cols: &[Col], headers: &[&str], values: &[&str], bold: bool) {
        if self.ensure_space(ROW_H) {
            self.table_header(cols, headers);
        }
        self.cells(cols, values, bold);
    }

    fn line(&mut self, s: &str, bold: bool) {
        self.ensure_space(ROW_H);
        self.text(s, MARGIN_LEFT, FONT_SIZE, bold);
        self.y += ROW_H;
    }

    fn separator(&mut self) {
        self.hline(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT);
        self.y += 2.0;
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        to_bytes(self.doc)
    }
}

fn to_bytes(doc: PdfDocumentReference) -> Result<Vec<u8>> {
    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| PassbookError::Pdf(format!("{e:?}")))?;
    buf.into_inner().map_err(|e| PassbookError::Pdf(e.to_string()))
}

// ---------------------------------------------------------------------------
// Vector statement
// ---------------------------------------------------------------------------

pub fn render_statement(
    view: &LedgerView,
    scope: &StatementScope,
    date_range: &str,
    company: &str,
) -> Result<Vec<u8>> {
    let title = "Bank & Cash Statements";
    let mut pdf = PdfWriter::new(title)?;
    pdf.header(title, company, &scope.heading(), date_range);

    if scope.shows_opening_balance() && view.has_opening_row {
        let banner = match view.opening_as_of {
            Some(d) => format!(
                "Opening Balance as of {}: {}",
                display_date(d),
                amount(view.opening_balance)
            ),
            None => format!("Opening Balance: {}", amount(view.opening_balance)),
        };
        pdf.line(&banner, true);
        pdf.y += 2.0;
    }

    let cols = &[
        Col { width: 22.0, align: Align::Left },
        Col { width: 45.0, align: Align::Left },
        Col { width: 51.0, align: Align::Left },
        Col { width: 24.0, align: Align::Right },
        Col { width: 24.0, align: Align::Right },
        Col { width: 24.0, align: Align::Right },
    ];
    let headers = &["Date", "Details", "Description", "Credit", "Debit", "Balance"];
    pdf.table_header(cols, headers);

    if view.rows.is_empty() {
        pdf.line("No transactions in this period.", false);
    }
    for row in &view.rows {
        let tx = &row.transaction;
        let date = display_opt_date(tx.date);
        let credit = if tx.credit { amount(tx.amount) } else { "-".to_string() };
        let debit = if tx.debit { amount(tx.amount) } else { "-".to_string() };
        let balance = amount(row.running_balance);
        pdf.table_row(
            cols,
            headers,
            &[&date, or_dash(&tx.details), or_dash(&tx.description), &credit, &debit, &balance],
            false,
        );
    }

    pdf.ensure_space(ROW_H * 3.0);
    pdf.separator();
    let credit = amount_or_dash(view.total_credit);
    let debit = amount_or_dash(view.total_debit);
    let closing = amount(view.closing_balance);
    pdf.cells(cols, &["", "Total", "", &credit, &debit, &closing], true);

    let words = amount_in_words(view.closing_balance);
    if !words.is_empty() {
        pdf.y += 2.0;
        pdf.line(&format!("Closing balance in words: {words}"), false);
    }

    pdf.to_bytes()
}

// ---------------------------------------------------------------------------
// Raster export
// ---------------------------------------------------------------------------

pub fn load_image(bytes: &[u8]) -> Result<DynamicImage> {
    image_crate::load_from_memory(bytes).map_err(|e| PassbookError::Image(e.to_string()))
}

fn positive_dpi(dpi: f64) -> Result<f64> {
    if dpi.is_finite() && dpi > 0.0 {
        Ok(dpi)
    } else {
        Err(PassbookError::InvalidGeometry(format!("dpi must be positive, got {dpi}")))
    }
}

/// Draw `image` at `placement` (top-left origin) on `layer`.
fn place_image(
    layer: PdfLayerReference,
    image: &DynamicImage,
    placement: &Placement,
    layout: &PageLayout,
    dpi: f64,
) {
    // Size printpdf gives the image at `dpi` before scaling.
    let natural_w = image.width() as f64 / dpi * MM_PER_INCH;
    let natural_h = image.height() as f64 / dpi * MM_PER_INCH;
    let scale_x = placement.width / natural_w;
    let scale_y = placement.height / natural_h;
    let bottom = layout.page_height - placement.y - placement.height;

    Image::from_dynamic_image(image).add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(placement.x as f32)),
            translate_y: Some(Mm(bottom as f32)),
            rotate: None,
            scale_x: Some(scale_x as f32),
            scale_y: Some(scale_y as f32),
            dpi: Some(dpi as f32),
        },
    );
}

/// One tall raster across as many pages as it needs, one slice per page.
pub fn render_raster(image: &DynamicImage, layout: &PageLayout, dpi: f64) -> Result<Vec<u8>> {
    let dpi = positive_dpi(dpi)?;
    let (width, height) = image.dimensions();
    let crops = raster_crops(width, height, layout)?;

    let page_w = Mm(layout.page_width as f32);
    let page_h = Mm(layout.page_height as f32);
    let (doc, first_page, first_layer) = PdfDocument::new("Statement", page_w, page_h, "Layer 1");
    let mut target = Some((first_page, first_layer));

    for crop in &crops {
        let band = image.crop_imm(0, crop.top, width, crop.bottom - crop.top);
        let (page, layer) = match target.take() {
            Some(first) => first,
            None => doc.add_page(page_w, page_h, "Layer"),
        };
        log::debug!(
            "page {}: rows {}..{} at {:.2}x{:.2}mm",
            crop.page_index + 1,
            crop.top,
            crop.bottom,
            crop.placement.width,
            crop.placement.height
        );
        place_image(doc.get_page(page).get_layer(layer), &band, &crop.placement, layout, dpi);
    }

    to_bytes(doc)
}

/// The whole image shrunk onto one page.
pub fn render_fitted(image: &DynamicImage, layout: &PageLayout, dpi: f64) -> Result<Vec<u8>> {
    let dpi = positive_dpi(dpi)?;
    let (width, height) = image.dimensions();
    let placement = fit_single_page(width as f64, height as f64, layout)?;

    let (doc, page, layer) = PdfDocument::new(
        "Statement",
        Mm(layout.page_width as f32),
        Mm(layout.page_height as f32),
        "Layer 1",
    );
    place_image(doc.get_page(page).get_layer(layer), image, &placement, layout, dpi);
    to_bytes(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::build_ledger;
    use crate::models::{PaymentType, Transaction, TransactionKind};
    use chrono::NaiveDate;
    use printpdf::image_crate::RgbImage;
    use rust_decimal::Decimal;

    fn tx(kind: TransactionKind, day: u32, amount: i64, credit: bool, details: &str) -> Transaction {
        Transaction {
            id: None,
            kind,
            date: NaiveDate::from_ymd_opt(2024, 1, day),
            amount: Decimal::from(amount),
            credit,
            debit: !credit,
            details: details.to_string(),
            description: String::new(),
            payment_type: Some(PaymentType::Cash),
            bank: None,
        }
    }

    #[test]
    fn test_clip_shortens_long_text() {
        assert_eq!(clip("Rent", 40.0, 9.0), "Rent");
        let clipped = clip(&"x".repeat(200), 20.0, 9.0);
        assert!(clipped.ends_with("..."));
        assert!(approx_text_width(&clipped, 9.0) <= 20.0);
    }

    #[test]
    fn test_render_statement_produces_pdf() {
        let mut opening = tx(TransactionKind::OpeningBalance, 1, 1000, false, "Opening Balance");
        opening.credit = false;
        opening.debit = false;
        let rows = vec![
            opening,
            tx(TransactionKind::Buyer, 5, 500, true, "Ravi"),
            tx(TransactionKind::Salary, 10, 200, false, "Asha"),
        ];
        let view = build_ledger(&rows, NaiveDate::from_ymd_opt(2024, 1, 2), None);
        let bytes = render_statement(&view, &StatementScope::Cash, "02-01-2024 onwards", "Acme").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_statement_spans_pages() {
        let rows: Vec<Transaction> = (0..200)
            .map(|i| tx(TransactionKind::Buyer, 1 + (i % 28) as u32, 10, true, "Payment"))
            .collect();
        let view = build_ledger(&rows, None, None);
        let bytes = render_statement(&view, &StatementScope::All, "All dates", "").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_statement_empty_view() {
        let view = build_ledger(&[], None, None);
        let bytes = render_statement(&view, &StatementScope::Bank(None), "All dates", "").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_raster_paginates() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(100, 260));
        let layout = PageLayout::default();
        let bytes = render_raster(&image, &layout, 96.0).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_raster_handles_narrow_strip() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(3, 1000));
        let bytes = render_raster(&image, &PageLayout::default(), 300.0).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_raster_rejects_bad_dpi() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
        let err = render_raster(&image, &PageLayout::default(), 0.0).unwrap_err();
        assert!(matches!(err, PassbookError::InvalidGeometry(_)));
    }

    #[test]
    fn test_render_raster_rejects_bad_layout() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
        assert!(render_raster(&image, &PageLayout::a4(200.0), 300.0).is_err());
    }

    #[test]
    fn test_render_fitted_produces_pdf() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(50, 400));
        let bytes = render_fitted(&image, &PageLayout::a4(15.0), 300.0).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_load_image_rejects_garbage() {
        let err = load_image(b"not an image").unwrap_err();
        assert!(matches!(err, PassbookError::Image(_)));
    }
}
