pub mod category;
pub mod note;

// Re-export handler functions for use in routing
pub use note::delete as note_delete;
pub use note::get as note_get;
pub use note::list as note_list;
pub use note::post as note_post;
pub use note::put as note_put;

pub use category::list as category_list;
pub use category::notes_in as category_notes;
pub use category::post as category_post;
