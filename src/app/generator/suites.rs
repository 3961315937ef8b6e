//! Built-in suite table

use super::types::{TestGroup, TestSuite};

const TEXTURE_SPECIFICATION_GROUPS: &[&str] = &[
    "basic_teximage2d",
    "random_teximage2d",
    "teximage2d_align",
    "teximage2d_unpack_params",
    "teximage2d_pbo",
    "teximage2d_depth",
    "teximage2d_depth_pbo",
    "basic_texsubimage2d",
    "texsubimage2d_empty_tex",
    "texsubimage2d_align",
    "texsubimage2d_unpack_params",
    "texsubimage2d_pbo",
    "texsubimage2d_depth",
    "basic_copyteximage2d",
    "basic_copytexsubimage2d",
    "basic_teximage3d",
    "teximage3d_unpack_params",
    "teximage3d_pbo",
    "teximage3d_depth",
    "teximage3d_depth_pbo",
    "basic_texsubimage3d",
    "texsubimage3d_unpack_params",
    "texsubimage3d_pbo",
    "texsubimage3d_depth",
    "texstorage2d",
    "texstorage3d",
];

/// Suites shipped with the tool
pub fn builtin_suites() -> Vec<TestSuite> {
    vec![TestSuite {
        name: "texturespecification".to_string(),
        title: "WebGL Texture Specification Tests".to_string(),
        namespace: "functional.gles3.es3fTextureSpecificationTests".to_string(),
        groups: TEXTURE_SPECIFICATION_GROUPS
            .iter()
            .map(|id| TestGroup::from(*id))
            .collect(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::generator::DEFAULT_SUITE;

    #[test]
    fn test_builtin_suites_are_valid() {
        for suite in builtin_suites() {
            suite.validate().unwrap();
        }
    }

    #[test]
    fn test_texture_specification_table() {
        let suites = builtin_suites();
        let suite = suites.iter().find(|s| s.name == DEFAULT_SUITE).unwrap();

        assert_eq!(suite.len(), 26);
        assert_eq!(suite.groups[0].as_str(), "basic_teximage2d");
        assert_eq!(suite.groups[1].as_str(), "random_teximage2d");
        assert_eq!(suite.groups[25].as_str(), "texstorage3d");
    }
}
