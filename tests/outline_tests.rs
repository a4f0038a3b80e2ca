//! End-to-end outline scenarios over full documents.

use modops::symbols::AssetRecord;
use modops::{EntryKind, ParseError, PatchDocument, SymbolDirectory, build_outline, outline_tree};
use once_cell::sync::Lazy;

static DIRECTORY: Lazy<SymbolDirectory> = Lazy::new(|| {
    let mut directory = SymbolDirectory::new();
    directory.insert(
        AssetRecord::new("1010017")
            .with_name("Residence_tier02")
            .with_english("Worker Residence")
            .with_template("ResidenceBuilding7"),
    );
    directory.insert(
        AssetRecord::new("120055")
            .with_name("Kontor_main_01")
            .with_template("Harbor"),
    );
    directory
});

#[test]
fn add_operation_with_new_record() {
    let text = "<ModOps><!-- # Buildings --><ModOp Type=\"add\"><Asset><Template>House</Template><Values><Standard><GUID>100</GUID><Name>Small House</Name></Standard></Values></Asset></ModOp></ModOps>";
    let doc = PatchDocument::parse(text, None).unwrap();

    let outline = build_outline(&doc, &SymbolDirectory::new());

    assert_eq!(outline.len(), 3);

    assert_eq!(outline[0].label, "Buildings");
    assert_eq!(outline[0].kind, EntryKind::Section);

    assert_eq!(outline[1].label, "add");
    assert_eq!(outline[1].kind, EntryKind::Operation);

    // no directory entry for 100, so the record label falls back to its
    // template name
    assert_eq!(outline[2].label, "House");
    assert_eq!(outline[2].kind, EntryKind::Record);
    assert_eq!(outline[2].guid.as_deref(), Some("100"));
}

#[test]
fn record_label_resolves_through_directory() {
    let text = "<ModOps><ModOp Type=\"add\"><Asset><Template>House</Template><Values><Standard><GUID>1010017</GUID><Name>ignored</Name></Standard></Values></Asset></ModOp></ModOps>";
    let doc = PatchDocument::parse(text, None).unwrap();

    let outline = build_outline(&doc, &DIRECTORY);
    assert_eq!(outline[2].label, "Worker Residence");
}

#[test]
fn operation_label_resolves_through_directory() {
    let text = "<ModOps><ModOp GUID=\"120055\" Type=\"merge\"><Values/></ModOp></ModOps>";
    let doc = PatchDocument::parse(text, None).unwrap();

    let outline = build_outline(&doc, &DIRECTORY);
    assert_eq!(outline[1].label, "Kontor_main_01");
    assert_eq!(outline[1].detail, "merge");
}

#[test]
fn malformed_document_yields_no_outline() {
    // an unterminated ModOp invalidates the whole snapshot: there is no
    // document and therefore no outline, not a truncated one
    let result = PatchDocument::parse("<ModOps><ModOp Type=\"add\">", None);
    assert!(matches!(
        result,
        Err(ParseError::UnterminatedElement { .. })
    ));
}

#[test]
fn outline_is_idempotent() {
    let text = "<ModOps>\n<!-- # A -->\n<Group>\n<ModOp GUID=\"120055\" Type=\"merge\"><X/></ModOp>\n<ModOp Add=\"/Values/List\"><Item><I>1010017</I></Item></ModOp>\n</Group>\n</ModOps>";
    let doc = PatchDocument::parse(text, None).unwrap();

    let first = build_outline(&doc, &DIRECTORY);
    let second = build_outline(&doc, &DIRECTORY);
    assert_eq!(first, second);
}

#[test]
fn tree_reconstruction_nests_by_level() {
    let text = "<ModOps>\n\
         <!-- # Economy -->\n\
         <ModOp Type=\"add\"/>\n\
         <ModOp Type=\"remove\"/>\n\
         <!-- # Harbor -->\n\
         <ModOp Type=\"merge\"/>\n\
         </ModOps>";
    let doc = PatchDocument::parse(text, None).unwrap();
    let outline = build_outline(&doc, &SymbolDirectory::new());

    let tree = outline_tree(&outline);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].entry.label, "Economy");
    assert_eq!(tree[0].children.len(), 2);
    assert_eq!(tree[1].entry.label, "Harbor");
    assert_eq!(tree[1].children.len(), 1);
}

#[test]
fn wrapper_group_merges_but_labeled_groups_stay() {
    let text = "<ModOps>\n\
         <Group>\n\
           <ModOp Type=\"add\"/>\n\
         </Group>\n\
         <!-- tweak pool -->\n\
         <Group MaxRepeat=\"3\">\n\
           <ModOp Type=\"merge\"/>\n\
         </Group>\n\
         </ModOps>";
    let doc = PatchDocument::parse(text, None).unwrap();
    let outline = build_outline(&doc, &SymbolDirectory::new());

    let labels: Vec<&str> = outline.iter().map(|e| e.label.as_str()).collect();
    // the unlabeled single-child wrapper is spliced out; the commented
    // loop keeps its label
    assert_eq!(labels, vec!["ModOps", "add", "tweak pool", "merge"]);
    assert_eq!(outline[2].detail, "MaxRepeat=3");
}

#[test]
fn operation_range_covers_whole_element() {
    let text = "<ModOps>\n  <ModOp Type=\"add\">\n    <Values>\n      <X>1</X>\n    </Values>\n  </ModOp>\n</ModOps>";
    let doc = PatchDocument::parse(text, None).unwrap();
    let outline = build_outline(&doc, &SymbolDirectory::new());

    let op = outline
        .iter()
        .find(|e| e.kind == EntryKind::Operation)
        .unwrap();
    assert_eq!(op.range.start.line, 1);
    // the close tag sits on line 5
    assert_eq!(op.range.end.line, 5);
}
