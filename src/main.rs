use dotenv::dotenv;

use wiki_bridge::get_text;

pub const DEFAULT_WIKI: &str = "https://wiki.mako.cc";
pub const DEFAULT_PAGE: &str = "Center for Extraordinary Postquarantine Dining";
pub const DEFAULT_SECTION: &str = "Grocery items";

/// `wiki_bridge [BASE_URL] [PAGE_TITLE] [SECTION_TITLE]`
fn main() {
    dotenv().ok();
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let base = args.next().unwrap_or_else(|| DEFAULT_WIKI.to_string());
    let page = args.next().unwrap_or_else(|| DEFAULT_PAGE.to_string());
    let section = args.next().unwrap_or_else(|| DEFAULT_SECTION.to_string());

    match get_text(&base, &page, &section) {
        Ok(list) => println!("{}", list),
        Err(e) => {
            log::error!("Failed to read {:?} from {:?}: {}", section, page, e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
