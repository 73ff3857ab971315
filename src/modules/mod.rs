pub mod books;
pub mod url_processor;

use std::sync::Arc;

use booklib_kernel::settings::Settings;
use booklib_kernel::ModuleRegistry;

use books::{BookRepository, BookService};
use url_processor::UrlProcessor;

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    settings: &Settings,
    book_repository: Arc<dyn BookRepository>,
) {
    let service = Arc::new(BookService::new(book_repository));
    registry.register_custom(books::create_module(service));

    let processor = Arc::new(UrlProcessor::new(&settings.url_processor));
    registry.register_custom(url_processor::create_module(processor));
}
