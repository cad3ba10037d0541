// quill/resources/src/lib.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Loading of shader sources and other bundled assets.

use std::fs;
use std::io::{Error as IOError, ErrorKind};
use std::path::PathBuf;

/// Provides access to bundled assets by virtual path, e.g.
/// `shaders/tile.fs.glsl`.
pub trait ResourceLoader {
    fn load(&self, virtual_path: &str) -> Result<Vec<u8>, IOError>;
}

/// Loads resources from a directory on disk.
pub struct FilesystemResourceLoader {
    pub directory: PathBuf,
}

impl FilesystemResourceLoader {
    /// Walks up from the current directory looking for a `shaders/`
    /// directory, the layout of a development checkout.
    pub fn locate() -> FilesystemResourceLoader {
        let mut directory = std::env::current_dir().expect("no current directory");
        loop {
            if directory.join("shaders").is_dir() {
                return FilesystemResourceLoader { directory };
            }
            if !directory.pop() {
                panic!("can't find a `shaders` directory");
            }
        }
    }
}

impl ResourceLoader for FilesystemResourceLoader {
    fn load(&self, virtual_path: &str) -> Result<Vec<u8>, IOError> {
        let mut path = self.directory.clone();
        for component in virtual_path.split('/') {
            path.push(component);
        }
        fs::read(&path)
    }
}

/// Serves the shader sources compiled into the binary.
pub struct EmbeddedResourceLoader;

static EMBEDDED_RESOURCES: &[(&str, &[u8])] = &[
    ("shaders/blit.vs.glsl", include_bytes!("../../shaders/blit.vs.glsl")),
    ("shaders/blit.fs.glsl", include_bytes!("../../shaders/blit.fs.glsl")),
    ("shaders/fill.vs.glsl", include_bytes!("../../shaders/fill.vs.glsl")),
    ("shaders/fill.fs.glsl", include_bytes!("../../shaders/fill.fs.glsl")),
    ("shaders/primitive.vs.glsl", include_bytes!("../../shaders/primitive.vs.glsl")),
    ("shaders/primitive.fs.glsl", include_bytes!("../../shaders/primitive.fs.glsl")),
    ("shaders/tile.vs.glsl", include_bytes!("../../shaders/tile.vs.glsl")),
    ("shaders/tile.fs.glsl", include_bytes!("../../shaders/tile.fs.glsl")),
];

impl ResourceLoader for EmbeddedResourceLoader {
    fn load(&self, virtual_path: &str) -> Result<Vec<u8>, IOError> {
        EMBEDDED_RESOURCES
            .iter()
            .find(|(path, _)| *path == virtual_path)
            .map(|(_, data)| data.to_vec())
            .ok_or_else(|| IOError::new(ErrorKind::NotFound, virtual_path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_lookup() {
        let loader = EmbeddedResourceLoader;
        assert!(loader.load("shaders/tile.fs.glsl").is_ok());
        assert!(loader.load("shaders/nope.glsl").is_err());
    }
}
