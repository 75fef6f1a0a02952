mod local_media;
mod media_source;
mod render_surface;

pub use local_media::*;
pub use media_source::*;
pub use render_surface::*;
