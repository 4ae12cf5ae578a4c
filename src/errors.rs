//! Error types for grid and maze construction, rendering and output.
//!
//! Other modules `use crate::errors::*;` to get `Error`, `ErrorKind`, `Result` and `ResultExt`.
#![allow(deprecated)]

use error_chain::*;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        ImageFailure(::image::ImageError);
    }

    errors {
        UnsupportedTopology(name: String) {
            description("unsupported grid topology")
            display("unsupported grid topology: '{}'", name)
        }
        InvalidDimensions(width: usize, height: usize) {
            description("grid dimensions must be at least 1x1")
            display("invalid grid dimensions {}x{}, both must be at least 1", width, height)
        }
        InvalidDoorPosition(index: usize) {
            description("door cell is not on the grid boundary")
            display("cell {} is not on the grid boundary, a door cannot be placed there", index)
        }
    }
}
