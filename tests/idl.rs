//! Integration tests for IDL extraction

use std::fs;

use tempfile::TempDir;
use webgl_devtools::app::idl::{extract_idl_file, license_header, render_idl};
use webgl_devtools::errors::IdlError;

const SPEC_HTML: &str = r##"<!DOCTYPE html>
<html>
<body>
<h1>WebGL 2.0</h1>
<pre class="idl">typedef long long GLint64;</pre>
<p>Some prose with <code>GLint64</code>.</p>
<pre class="example">not idl</pre>
<pre class="idl">interface <a href="#WebGL2RenderingContext">WebGL2RenderingContext</a> {
  void <a href="#copyBufferSubData">copyBufferSubData</a>();
};</pre>
</body>
</html>
"##;

#[test]
fn test_extract_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.html");
    fs::write(&path, SPEC_HTML).unwrap();

    let idl = extract_idl_file(&path, 2015).unwrap();

    let body = idl.strip_prefix(&license_header(2015)).unwrap();
    assert_eq!(
        body,
        "typedef long long GLint64;\n\ninterface WebGL2RenderingContext {\n  void copyBufferSubData();\n};"
    );
    assert!(idl.contains("Copyright (c) 2015 The Khronos Group Inc."));
    assert!(!idl.contains("not idl"));
}

#[test]
fn test_no_idl_blocks_gives_only_header() {
    let idl = render_idl("<html><body><p>nothing</p></body></html>", 2024).unwrap();
    assert_eq!(idl, license_header(2024));
}

#[test]
fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = extract_idl_file(&temp_dir.path().join("missing.html"), 2024);
    assert!(matches!(result, Err(IdlError::Read { .. })));
}
