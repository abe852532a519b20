//! Fixture support for integration tests: writes minimal XLSX workbooks
//! carrying the five sheets the loader expects.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A fixture cell: inline string or number. Dates go in as text
/// ("2025-01-10 09:30:00") or as Excel serial numbers.
pub enum Val {
    S(&'static str),
    N(f64),
}

pub struct SheetSpec {
    pub name: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<Val>>,
}

pub fn sales_sheet(rows: Vec<Vec<Val>>) -> SheetSpec {
    SheetSpec {
        name: "sales_transactions",
        headers: &[
            "transaction_date",
            "product_id",
            "product_category",
            "quantity_sold",
            "total_amount",
        ],
        rows,
    }
}

pub fn inventory_sheet(rows: Vec<Vec<Val>>) -> SheetSpec {
    SheetSpec {
        name: "inventory_daily_snapshot",
        headers: &[
            "snapshot_date",
            "product_id",
            "opening_stock",
            "received_qty",
            "sold_qty",
            "damaged_qty",
            "expired_qty",
            "closing_stock",
        ],
        rows,
    }
}

pub fn expenses_sheet(rows: Vec<Vec<Val>>) -> SheetSpec {
    SheetSpec {
        name: "operating_expenses",
        headers: &["expense_date", "expense_category", "expense_amount"],
        rows,
    }
}

pub fn products_sheet(rows: Vec<Vec<Val>>) -> SheetSpec {
    SheetSpec {
        name: "products",
        headers: &[
            "product_id",
            "product_name",
            "category",
            "cost_price",
            "reorder_level",
        ],
        rows,
    }
}

pub fn suppliers_sheet(rows: Vec<Vec<Val>>) -> SheetSpec {
    SheetSpec {
        name: "suppliers",
        headers: &["supplier_id", "supplier_name", "contact_phone"],
        rows,
    }
}

/// The usual five-sheet layout with a throwaway suppliers sheet.
pub fn five_sheets(
    sales: Vec<Vec<Val>>,
    inventory: Vec<Vec<Val>>,
    expenses: Vec<Vec<Val>>,
    products: Vec<Vec<Val>>,
) -> Vec<SheetSpec> {
    vec![
        sales_sheet(sales),
        inventory_sheet(inventory),
        expenses_sheet(expenses),
        products_sheet(products),
        suppliers_sheet(vec![vec![
            Val::N(1.0),
            Val::S("Mainland Distribution Ltd"),
            Val::S("+234-801-555-0101"),
        ]]),
    ]
}

/// Write `sheets` as an XLSX file at `path`.
pub fn write_workbook(path: &Path, sheets: &[SheetSpec]) {
    let file = File::create(path).expect("create xlsx fixture");
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)
        .expect("zip entry");
    zip.write_all(content_types(sheets.len()).as_bytes())
        .expect("zip write");

    zip.start_file("_rels/.rels", options).expect("zip entry");
    zip.write_all(ROOT_RELS.as_bytes()).expect("zip write");

    zip.start_file("xl/workbook.xml", options).expect("zip entry");
    zip.write_all(workbook_xml(sheets).as_bytes())
        .expect("zip write");

    zip.start_file("xl/_rels/workbook.xml.rels", options)
        .expect("zip entry");
    zip.write_all(workbook_rels(sheets.len()).as_bytes())
        .expect("zip write");

    for (i, sheet) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
            .expect("zip entry");
        zip.write_all(sheet_xml(sheet).as_bytes()).expect("zip write");
    }

    zip.finish().expect("finish xlsx fixture");
}

const ROOT_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    "<Relationship Id=\"rId1\" ",
    "Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" ",
    "Target=\"xl/workbook.xml\"/>",
    "</Relationships>"
);

fn content_types(sheet_count: usize) -> String {
    let mut xml = String::from(concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        "<Default Extension=\"rels\" ",
        "ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
        "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
        "<Override PartName=\"/xl/workbook.xml\" ",
        "ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>",
    ));
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            "<Override PartName=\"/xl/worksheets/sheet{i}.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>"
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn workbook_xml(sheets: &[SheetSpec]) -> String {
    let mut xml = String::from(concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
        "<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" ",
        "xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">",
        "<sheets>",
    ));
    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>",
            xml_escape(sheet.name),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::from(concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    ));
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{i}\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" \
             Target=\"worksheets/sheet{i}.xml\"/>"
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn sheet_xml(sheet: &SheetSpec) -> String {
    let mut xml = String::from(concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
        "<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">",
        "<sheetData>",
    ));
    xml.push_str("<row r=\"1\">");
    for (c, header) in sheet.headers.iter().enumerate() {
        xml.push_str(&string_cell(c, 1, header));
    }
    xml.push_str("</row>");
    for (r, row) in sheet.rows.iter().enumerate() {
        let row_num = r + 2;
        xml.push_str(&format!("<row r=\"{row_num}\">"));
        for (c, val) in row.iter().enumerate() {
            match val {
                Val::S(s) => xml.push_str(&string_cell(c, row_num, s)),
                Val::N(n) => xml.push_str(&format!(
                    "<c r=\"{}{row_num}\"><v>{n}</v></c>",
                    col_letter(c)
                )),
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn string_cell(col: usize, row: usize, text: &str) -> String {
    format!(
        "<c r=\"{}{row}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
        col_letter(col),
        xml_escape(text)
    )
}

fn col_letter(mut col: usize) -> String {
    let mut s = String::new();
    loop {
        s.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    s
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
