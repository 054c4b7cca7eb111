use std::path::Path;

use pumice::cache::{cache_directory, CachePurpose};
use pumice::BuildMode;

const PURPOSES: &[CachePurpose] = &[
    CachePurpose::PreTransform,
    CachePurpose::Transpile,
    CachePurpose::TranspileDependencies,
];

const ROOTS: &[&str] = &["/", "/project", "relative/root", ""];

#[test]
fn modes_never_share_a_directory() {
    for root in ROOTS {
        for purpose in PURPOSES {
            let dev = cache_directory(root, BuildMode::Development, *purpose);
            let prod = cache_directory(root, BuildMode::Production, *purpose);
            assert_ne!(dev, prod);
        }
    }
}

#[test]
fn purposes_never_share_a_directory() {
    for (i, a) in PURPOSES.iter().enumerate() {
        for b in &PURPOSES[i + 1..] {
            assert_ne!(
                cache_directory("/project", BuildMode::Production, *a),
                cache_directory("/project", BuildMode::Production, *b)
            );
        }
    }
}

#[test]
fn layout() {
    assert_eq!(
        Path::new("/project/.cache/pre-transform/dev"),
        cache_directory("/project", BuildMode::Development, CachePurpose::PreTransform)
    );
    assert_eq!(
        Path::new("/project/.cache/transpile/prod"),
        cache_directory("/project", BuildMode::Production, CachePurpose::Transpile)
    );
}
