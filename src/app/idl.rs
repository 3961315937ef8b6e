//! IDL extraction from HTML specifications
//!
//! The WebGL specs keep their Web IDL inline in `<pre class="idl">` blocks.
//! This module pulls those blocks out, in document order, and prefixes them
//! with the license header that accompanies the published `.idl` files.

use std::path::Path;

use chrono::Datelike;
use scraper::{Html, Selector};
use tracing::debug;

use crate::constants::idl::{FRAGMENT_SEPARATOR, IDL_SELECTOR};
use crate::errors::{IdlError, IdlResult};

const LICENSE_TEMPLATE: &str = r#"
// Copyright (c) {YEAR} The Khronos Group Inc.
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and/or associated documentation files (the
// "Materials"), to deal in the Materials without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Materials, and to
// permit persons to whom the Materials are furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Materials.
//
// THE MATERIALS ARE PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// MATERIALS OR THE USE OR OTHER DEALINGS IN THE MATERIALS.

"#;

/// License header for the given copyright year
pub fn license_header(year: i32) -> String {
    LICENSE_TEMPLATE.replace("{YEAR}", &year.to_string())
}

/// The current calendar year in local time
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Text content of every `pre.idl` element, in document order
///
/// Text is collected from all descendant text nodes, so markup inside a
/// block (links, spans) is flattened and comments are dropped.
pub fn extract_fragments(html: &str) -> IdlResult<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(IDL_SELECTOR).map_err(|_| IdlError::InvalidSelector {
        selector: IDL_SELECTOR.to_string(),
    })?;

    let fragments: Vec<String> = document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect();

    debug!("Found {} IDL blocks", fragments.len());
    Ok(fragments)
}

/// License header followed by the extracted IDL blocks
pub fn render_idl(html: &str, year: i32) -> IdlResult<String> {
    let fragments = extract_fragments(html)?;
    Ok(license_header(year) + &fragments.join(FRAGMENT_SEPARATOR))
}

/// Read an HTML spec and render its IDL
pub fn extract_idl_file(path: &Path, year: i32) -> IdlResult<String> {
    let html = std::fs::read_to_string(path).map_err(|source| IdlError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    render_idl(&html, year)
}
