use crate::{
    errors::{AtStage, BridgeError, Stage, WikiError},
    reqwest_client::{ClientConfig, RustClient, Transport},
    section::SectionExtractor,
    wiki_api::{fetch_content, resolve_latest_revision, resolve_page_id},
    wikitext::{MarkupParser, WikitextParser},
};

/// Get the raw markup of the latest revision of a page.
///
/// Runs page lookup, revision lookup and content fetch one after the other;
/// the first failure stops the rest.
pub fn get_page_text<T: Transport + ?Sized>(
    transport: &T,
    base: &str,
    page_title: &str,
) -> Result<String, BridgeError> {
    let page_id = resolve_page_id(transport, base, page_title).at(Stage::PageLookup)?;
    let revision_id =
        resolve_latest_revision(transport, base, page_id).at(Stage::RevisionLookup)?;
    fetch_content(transport, base, revision_id).at(Stage::ContentFetch)
}

/// Full pipeline with a caller supplied transport, parser and extractor.
///
/// # Arguments
/// - transport -> How to reach the wiki.
/// - parser -> Turns the fetched markup into a document tree.
/// - extractor -> Which headings count and how the section is cut.
/// - base -> Wiki root url.
/// - page_title -> Page to read.
/// - section_title -> Text the heading has to contain.
///
/// # Returns
/// - Ok(String) -> One bullet per line.
/// - Err(BridgeError) -> The first failure, tagged with the stage it came from.
pub fn get_section_text_with<T, P>(
    transport: &T,
    parser: &P,
    extractor: &SectionExtractor,
    base: &str,
    page_title: &str,
    section_title: &str,
) -> Result<String, BridgeError>
where
    T: Transport + ?Sized,
    P: MarkupParser,
{
    if section_title.is_empty() {
        return Err(BridgeError::new(
            Stage::Extract,
            WikiError::invalid_arg("section title is empty"),
        ));
    }

    let markup = get_page_text(transport, base, page_title)?;
    let root = parser.parse(&markup).at(Stage::Parse)?;
    let section = extractor.extract(&root, section_title).at(Stage::Extract)?;

    log::info!(
        "Extracted {} lines from {:?} / {:?}",
        section.lines.len(),
        page_title,
        section.title
    );
    Ok(section.to_bullet_list())
}

/// Extract one section of a page as a bullet list, using the bundled parser
/// and second level headings.
pub fn get_section_text<T: Transport + ?Sized>(
    transport: &T,
    base: &str,
    page_title: &str,
    section_title: &str,
) -> Result<String, BridgeError> {
    get_section_text_with(
        transport,
        &WikitextParser,
        &SectionExtractor::default(),
        base,
        page_title,
        section_title,
    )
}

/// Convenience entry point: builds a client from the environment and runs
/// [`get_section_text`].
pub fn get_text(
    base: &str,
    page_title: &str,
    section_title: &str,
) -> Result<String, BridgeError> {
    let client = RustClient::new(&ClientConfig::from_env()).at(Stage::PageLookup)?;
    get_section_text(&client, base, page_title, section_title)
}
