use pulldown_cmark::{html, Options, Parser};

/// Markdown source to an HTML fragment that is safe to embed in a page.
///
/// pulldown-cmark passes raw HTML straight through, so its output goes through
/// ammonia's allow-list before it reaches a template.
pub fn render_markdown(source: &str) -> String {
    let source = source.replace("\r\n", "\n");

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(&source, options);
    let mut unsafe_html = String::with_capacity(source.len() * 2);
    html::push_html(&mut unsafe_html, parser);

    ammonia::clean(&unsafe_html)
}
