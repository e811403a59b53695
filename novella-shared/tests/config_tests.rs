use novella_shared::config;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
struct Section {
    name: String,
    count: u32,
}

// One test so the global store is only touched from one thread.
#[test]
fn sections_load_and_fall_back() {
    config::init_from_str("[section]\nname = \"x\"\ncount = 3\n[broken]\ncount = \"nope\"\n")
        .unwrap();

    let section: Section = config::get("section");
    assert_eq!(section, Section { name: "x".into(), count: 3 });

    let missing: Section = config::get("missing");
    assert_eq!(missing, Section::default());

    let broken: Section = config::get("broken");
    assert_eq!(broken, Section::default());

    config::init_from_str("[section]\ncount = 9\n").unwrap();
    let reloaded: Section = config::get("section");
    assert_eq!(reloaded, Section { name: String::new(), count: 9 });
}
