use super::*;

#[test]
fn test_parse_desktop_version() {
    assert_eq!(GlVersion::parse("4.6.0 NVIDIA 535.54.03"), Some(GlVersion::new(4, 6)));
    assert_eq!(GlVersion::parse("3.3 (Core Profile) Mesa 23.1.0"), Some(GlVersion::new(3, 3)));
    assert_eq!(GlVersion::parse("2.1"), Some(GlVersion::new(2, 1)));
}

#[test]
fn test_parse_es_version() {
    assert_eq!(GlVersion::parse("OpenGL ES 3.2 Mesa 23.1.0"), Some(GlVersion::new(3, 2)));
    assert_eq!(GlVersion::parse("OpenGL ES 2.0 (ANGLE 2.1.0)"), Some(GlVersion::new(2, 0)));
    assert_eq!(GlVersion::parse("OpenGL ES-CM 1.1"), Some(GlVersion::new(1, 1)));
}

#[test]
fn test_parse_garbage() {
    assert_eq!(GlVersion::parse(""), None);
    assert_eq!(GlVersion::parse("OpenGL"), None);
    assert_eq!(GlVersion::parse("four.six"), None);
}

#[test]
fn test_version_ordering() {
    assert!(GlVersion::new(3, 0) > GlVersion::new(2, 1));
    assert!(GlVersion::new(4, 6) >= GlVersion::new(4, 6));
}

#[test]
fn test_profile_queries() {
    let profile = GlProfile::new(
        GlApiKind::Es,
        GlVersion::new(2, 0),
        vec!["GL_OES_element_index_uint".to_string()],
    );
    assert!(profile.is_es());
    assert!(profile.at_least(2, 0));
    assert!(!profile.at_least(3, 0));
    assert!(profile.has_extension("GL_OES_element_index_uint"));
    assert!(!profile.has_extension("GL_OES_texture_npot"));
}
