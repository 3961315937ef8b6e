//! Page template for generated conformance test files
//!
//! The harness expects every generated page to have the same shape: load the
//! shared test scripts, require the suite's closure namespace, then call its
//! `run` with a two-element `[start, end]` range. Only the suite details and
//! the two integers change between pages.

use super::types::TestSuite;

/// Renders pages for one suite
#[derive(Debug, Clone, Copy)]
pub struct PageTemplate<'a> {
    suite: &'a TestSuite,
}

impl<'a> PageTemplate<'a> {
    pub fn new(suite: &'a TestSuite) -> Self {
        Self { suite }
    }

    /// Render the page that runs groups `[start, end)`
    pub fn render(&self, start: usize, end: usize) -> String {
        format!(
            r#"<!--

This file is auto-generated by webgl_devtools from the '{name}' suite.
DO NOT EDIT!

-->

<html>
<head>
<meta http-equiv="Content-Type" content="text/html; charset=utf-8">
<title>{title}</title>
<link rel="stylesheet" href="../../../../resources/js-test-style.css"/>
<script src="../../../../js/js-test-pre.js"></script>
<script src="../../../../js/webgl-test-utils.js"></script>

<script src="../../../../closure-library/closure/goog/base.js"></script>
<script src="../../../deqp-deps.js"></script>
<script>goog.require('{namespace}');</script>
</head>
<body>
<div id="description"></div>
<div id="console"></div>
<canvas id="canvas" width="256" height="256"> </canvas>
<script>
var wtu = WebGLTestUtils;
var gl = wtu.create3DContextWithWrapperThatThrowsOnGLError('canvas', null, 2);


    try {{
        {namespace}.run(gl, [{start}, {end}]);
    }}
    catch(err)
    {{
        bufferedLogToConsole(err);
    }}

</script>
</body>
</html>
"#,
            name = self.suite.name,
            title = self.suite.title,
            namespace = self.suite.namespace,
            start = start,
            end = end,
        )
    }
}
