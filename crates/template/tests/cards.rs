mod common;

use common::*;
use html::Node;
use serde_json::json;
use template::{DataMode, RenderOptions, Template, Value};

const WORDS: [&str; 4] = ["Lorem", "Ipsum", "Dolor", "Sit"];

fn card_template() -> Template {
    Template::from_selector(&cards_document(), "#template-element").unwrap()
}

fn with_content(mut data: Value, key: &str, value: Value) -> Value {
    if let Value::Map(record) = &mut data {
        if let Some(Value::Map(content)) = record.get_mut("content") {
            content.insert(key.to_string(), value);
        }
    }
    data
}

#[test]
fn renders_without_data() {
    let rendered = card_template().create_element(None).unwrap();
    let card = rendered.first();
    assert_eq!(card.attribute("class"), Some("card"));
    assert_eq!(
        card.attribute("item-id"),
        Some("{{cardName}}-{{cardIndex}}")
    );
    assert_eq!(
        select(card, ".card-title").attribute("item-content"),
        Some("cardTitle")
    );
}

#[test]
fn renders_split_data() {
    let rendered = card_template()
        .create_element(Some(&split(card_content(), card_attr())))
        .unwrap();
    assert!(rendered.is_single());
    assert_card(rendered.first(), &card_attr(), &card_content());
    assert!(has_no_markers(rendered.first()));
}

#[test]
fn renders_flat_data() {
    let rendered = card_template()
        .create_element(Some(&flat(card_content(), card_attr())))
        .unwrap();
    assert_card(rendered.first(), &card_attr(), &card_content());
    assert!(has_no_markers(rendered.first()));
}

#[test]
fn forced_flat_mode_reads_content_and_attr_as_plain_keys() {
    let template = Template::from_markup(
        r#"<p item item-content="content" item-title="{{attr}}"></p>"#,
    );
    let data = Value::from(json!({"content": {"a": 1}, "attr": {"b": 2}}));
    let err = template
        .create(
            Some(&data),
            &RenderOptions::default().with_data_mode(DataMode::Flat),
        )
        .unwrap_err();
    assert_eq!(
        err,
        template::TemplateError::InvalidContentValue {
            key: "content".into(),
            found: "map"
        }
    );
}

#[test]
fn accepts_a_node_as_content() {
    let paragraph = Node::element(
        "p",
        vec![("id".into(), Some("paragraph".into()))],
        vec![Node::text("Lorem Ipsum")],
    );
    let data = with_content(
        split(card_content(), card_attr()),
        "cardContent",
        Value::from(paragraph.clone()),
    );
    let rendered = card_template().create_element(Some(&data)).unwrap();
    let inserted = select(rendered.first(), "#paragraph");
    assert_eq!(inserted, &paragraph);
}

#[test]
fn accepts_a_list_of_nodes_as_content() {
    let paragraphs: Vec<Value> = WORDS
        .iter()
        .map(|word| {
            Value::from(Node::element(
                "p",
                vec![("class".into(), Some("paragraph".into()))],
                vec![Node::text(*word)],
            ))
        })
        .collect();
    let data = with_content(
        split(card_content(), card_attr()),
        "cardContent",
        Value::List(paragraphs),
    );
    let rendered = card_template().create_element(Some(&data)).unwrap();
    let found = rendered.first().select(".paragraph").unwrap();
    assert_eq!(found.len(), WORDS.len());
    assert_eq!(select(rendered.first(), ".card-body").text_content(), WORDS.concat());
}

#[test]
fn accepts_a_list_of_strings_as_content() {
    let data = split(
        json!({"cardTitle": "Lorem Ipsum Dolo Sit", "cardContent": WORDS}),
        card_attr(),
    );
    let rendered = card_template().create_element(Some(&data)).unwrap();
    assert_eq!(
        select(rendered.first(), ".card-body").text_content(),
        WORDS.concat()
    );
}

#[test]
fn markup_content_is_parsed_only_with_accept_html() {
    let markup: Vec<String> = WORDS
        .iter()
        .map(|word| format!(r#"<p class="paragraph">{word}</p>"#))
        .collect();
    let data = split(
        json!({"cardTitle": "Lorem Ipsum Dolo Sit", "cardContent": markup}),
        card_attr(),
    );
    let template = card_template();

    let as_html = template
        .create(Some(&data), &RenderOptions::default().with_accept_html(true))
        .unwrap();
    assert_eq!(as_html.first().select(".paragraph").unwrap().len(), WORDS.len());

    let as_text = template.create_element(Some(&data)).unwrap();
    assert!(as_text.first().select(".paragraph").unwrap().is_empty());
    assert!(
        select(as_text.first(), ".card-body")
            .text_content()
            .starts_with(r#"<p class="paragraph">Lorem</p>"#)
    );
}

#[test]
fn zero_and_false_are_inserted() {
    let template = Template::from_markup(
        r#"<p><b item item-content="zero"></b><i item item-content="no"></i></p>"#,
    );
    let rendered = template
        .create_element(Some(&Value::from(json!({"zero": 0, "no": false}))))
        .unwrap();
    assert_eq!(
        rendered.first().outer_html(),
        "<p><b>0</b><i>false</i></p>"
    );
}

#[test]
fn insertion_positions_follow_markers() {
    let template = Template::from_selector(&cards_document(), "#positions").unwrap();
    let rendered = template
        .create_element(Some(&Value::from(json!({"words": ["a", "b", "c"]}))))
        .unwrap();
    let section = rendered.first();

    assert_eq!(select(section, ".append").text_content(), "abc");
    assert_eq!(select(section, ".prepend").text_content(), "cba");
    assert_eq!(select(section, ".wrap").text_content().trim(), "abc");
    assert_eq!(select(section, ".wrap-reversed").text_content().trim(), "cba");
    assert!(section.select("span").unwrap().is_empty());
    assert!(has_no_markers(section));
    assert!(!select(section, ".prepend").has_attribute("prepend"));
}

#[test]
fn checkbox_and_radio_follow_booleans() {
    let template = Template::from_selector(&cards_document(), "#form-element").unwrap();
    let rendered = template
        .create_element(Some(&Value::from(json!({
            "agreed": false,
            "plan": true,
            "name": "Ada",
            "bio": "Hello",
        }))))
        .unwrap();
    let form = rendered.first();
    assert!(!select(form, "[name=agreed]").has_attribute("checked"));
    assert!(select(form, "[name=plan]").has_attribute("checked"));
    assert_eq!(select(form, "[name=name]").attribute("value"), Some("Ada"));
    assert_eq!(select(form, "textarea").text_content(), "Hello");
    assert!(has_no_markers(form));
}

#[test]
fn null_values_keep_form_defaults() {
    let template = Template::from_selector(&cards_document(), "#form-element").unwrap();
    let rendered = template
        .create_element(Some(&Value::from(json!({
            "agreed": null,
            "plan": "true",
            "bio": null,
        }))))
        .unwrap();
    let form = rendered.first();
    assert!(select(form, "[name=agreed]").has_attribute("checked"));
    // Only the boolean `true` checks a box.
    assert!(!select(form, "[name=plan]").has_attribute("checked"));
    assert_eq!(
        select(form, "[name=name]").attribute("value"),
        Some("anonymous")
    );
    assert_eq!(select(form, "textarea").text_content(), "default bio");
}

#[test]
fn split_value_markers_read_attr() {
    let template = Template::from_markup(r#"<input type="text" item item-value="name">"#);
    let rendered = template
        .create_element(Some(&Value::from(json!({
            "content": {"name": "wrong"},
            "attr": {"name": "right"},
        }))))
        .unwrap();
    assert_eq!(rendered.first().attribute("value"), Some("right"));
}

#[test]
fn multi_root_templates_return_every_root() {
    let template = Template::from_selector(&cards_document(), "#multi-root").unwrap();
    let rendered = template
        .create_element(Some(&Value::from(json!({"term": "Rust", "definition": "A language"}))))
        .unwrap();
    assert_eq!(rendered.len(), 2);
    let html: Vec<String> = rendered.nodes().iter().map(Node::outer_html).collect();
    assert_eq!(html, ["<dt>Rust</dt>", "<dd>A language</dd>"]);
}

#[test]
fn script_templates_are_parsed() {
    let template = Template::from_selector(&cards_document(), "#script-element").unwrap();
    let rendered = template
        .create_element(Some(&Value::from(json!({"index": 1, "label": "one"}))))
        .unwrap();
    assert_eq!(
        rendered.first().outer_html(),
        r#"<li class="entry" data-index="1">one</li>"#
    );
}

#[test]
fn render_appends_instances_in_order() {
    let mut doc = cards_document();
    let template = Template::from_selector(&doc, "#script-element").unwrap();
    let count = template
        .render(
            &mut doc,
            "#list",
            Some(&Value::from(json!([
                {"index": 1, "label": "one"},
                {"index": 2, "label": "two"},
            ]))),
            &RenderOptions::default(),
        )
        .unwrap();
    assert_eq!(count, 2);
    let list = element(&doc, "#list");
    assert_eq!(doc.text_content(list), "firstonetwo");
}

#[test]
fn render_prepend_keeps_each_instance_intact() {
    let mut doc = cards_document();
    let template = Template::from_selector(&doc, "#multi-root").unwrap();
    template
        .render(
            &mut doc,
            "#glossary",
            Some(&Value::from(json!([
                {"term": "a", "definition": "1"},
                {"term": "b", "definition": "2"},
            ]))),
            &RenderOptions::default().with_prepend(true),
        )
        .unwrap();
    let glossary = element(&doc, "#glossary");
    assert_eq!(
        doc.inner_html(glossary),
        "<dt>b</dt><dd>2</dd><dt>a</dt><dd>1</dd>"
    );
}

#[test]
fn render_replaces_a_marked_container() {
    let mut doc = cards_document();
    let template = Template::from_selector(&doc, "#script-element").unwrap();
    let slot = element(&doc, "#slot");
    template
        .render(
            &mut doc,
            slot,
            Some(&Value::from(json!([
                {"index": 1, "label": "one"},
                {"index": 2, "label": "two"},
            ]))),
            &RenderOptions::default(),
        )
        .unwrap();
    let wrapper = element(&doc, "#wrapper");
    assert_eq!(
        doc.inner_html(wrapper),
        r#"<li class="entry" data-index="1">one</li><li class="entry" data-index="2">two</li>"#
    );
    assert_eq!(doc.parent(slot), None);
}

#[test]
fn render_without_data_inserts_an_unfilled_instance() {
    let mut doc = cards_document();
    let template = Template::from_markup("<li>static</li>");
    let count = template
        .render(&mut doc, "#list", None, &RenderOptions::default())
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(doc.text_content(element(&doc, "#list")), "firststatic");
}

#[test]
fn once_detaches_the_template_element() {
    let mut doc = cards_document();
    let rendered = Template::create_once(
        &mut doc,
        "#template-element",
        Some(&split(card_content(), card_attr())),
    )
    .unwrap();
    assert_card(rendered.first(), &card_attr(), &card_content());
    assert_eq!(
        doc.query_selector(doc.root(), "#template-element").unwrap(),
        None
    );
}

#[test]
fn templates_can_be_reused() {
    let template = card_template();
    for index in 0..3 {
        let mut attr = card_attr();
        attr["cardIndex"] = json!(index);
        let rendered = template
            .create_element(Some(&split(card_content(), attr.clone())))
            .unwrap();
        assert_card(rendered.first(), &attr, &card_content());
    }
}

#[test]
fn deeply_nested_templates_render() {
    let depth = 10_000;
    let markup = format!(
        r#"{}<p item item-content="a"></p>{}"#,
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    let rendered = Template::from_markup(&markup)
        .create_element(Some(&Value::from(json!({"a": "x"}))))
        .unwrap();
    let root = rendered.first();
    assert_eq!(root.text_content(), "x");
    assert_eq!(select(root, "p").outer_html(), "<p>x</p>");
    assert!(has_no_markers(root));
}
