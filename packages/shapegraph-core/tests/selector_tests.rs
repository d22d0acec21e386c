//! End-to-end selector tests against the weather model

mod common;

use common::*;
use pretty_assertions::assert_eq;
use shapegraph_core::{
    Selector, SelectorBatch, SelectorConfig, SelectorError, SemanticError, ShapeId,
};

#[test]
fn test_sensitive_member_targets() {
    let model = weather_model();
    assert_selects(&model, "structure > member > string[trait|sensitive]", &["Password"]);
}

#[test]
fn test_list_and_set_are_interchangeable() {
    let model = weather_model();
    assert_selects(&model, "list", &["CitySummaries", "Tags"]);
    assert_selects(&model, "set", &["CitySummaries", "Tags"]);
    assert_selects(&model, "collection", &["CitySummaries", "Tags"]);
}

#[test]
fn test_service_closure() {
    let model = weather_model();
    assert_selects(
        &model,
        "service ~> operation",
        &["GetCity", "GetCurrentTime", "ListCities"],
    );
    assert_selects(&model, "resource -[identifier]-> string", &["CityId"]);
}

#[test]
fn test_required_input_members() {
    let model = weather_model();
    assert_selects(
        &model,
        "operation -[input]-> structure > member [trait|required]",
        &["GetCityInput$cityId"],
    );
}

#[test]
fn test_reverse_neighbors() {
    let model = weather_model();
    assert_selects(
        &model,
        "string [id|name = CityId] <",
        &["City", "CitySummary$cityId", "GetCityInput$cityId"],
    );
    assert_selects(&model, "structure <-[error]- operation", &["GetCity"]);
}

#[test]
fn test_functions() {
    let model = weather_model();
    assert_selects(
        &model,
        "operation :not(-[error]->)",
        &["GetCurrentTime", "ListCities"],
    );
    assert_selects(
        &model,
        "structure :test(> member [trait|required])",
        &[
            "CitySummary",
            "GetCityInput",
            "GetCityOutput",
            "GetCurrentTimeOutput",
            "ListCitiesOutput",
        ],
    );
    assert_selects(
        &model,
        "member :test(> :in(:root(string [trait|sensitive])))",
        &["Credentials$password"],
    );
    assert_selects(&model, ":is(resource, service)", &["City", "Weather"]);
}

#[test]
fn test_attribute_comparisons() {
    let model = weather_model();
    assert_selects(&model, "[trait|error = client]", &["NoSuchResource"]);
    assert_selects(&model, "[trait|deprecated|since = '2.0']", &["LegacyId"]);
    assert_selects(&model, "[trait|deprecated|message ^= use i]", &["LegacyId"]);
    assert_selects(&model, "[service|version ^= 2006]", &["Weather"]);
    assert_selects(
        &model,
        "[id|member = cityId]",
        &["CitySummary$cityId", "GetCityInput$cityId"],
    );
    assert_selects(&model, "[id|namespace != 'example.weather']", &[]);
}

#[test]
fn test_variables_are_reported() {
    let model = weather_model();
    let selector = Selector::parse("resource $city -[read]-> operation -[output]-> structure").unwrap();
    let matches = selector.select_matches(&model);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].shape, sid("GetCityOutput"));
    assert_eq!(matches[0].variables["city"], vec![sid("City")]);
}

#[test]
fn test_results_are_deterministic() {
    let first = select_ids(&weather_model(), "* ~> *");
    for _ in 0..3 {
        assert_eq!(select_ids(&weather_model(), "* ~> *"), first);
    }

    let mut sorted = first.clone();
    sorted.sort();
    sorted.dedup();
    // Ids compare field by field, which agrees with text order for this model
    assert_eq!(first, sorted);
}

#[test]
fn test_scoped_results_are_a_subset() {
    let model = weather_model();
    let selector = Selector::parse("~> structure").unwrap();
    let all = selector.select(&model);
    let scoped = selector.select_from(&model, &[sid("ListCities")]);

    let scoped_ids: Vec<&ShapeId> = scoped.iter().map(|s| s.id()).collect();
    assert_eq!(
        scoped_ids,
        vec![
            &sid("CitySummary"),
            &sid("ListCitiesInput"),
            &sid("ListCitiesOutput"),
        ]
    );
    assert!(scoped.iter().all(|s| all.contains(s)));
}

#[test]
fn test_matches_one_shape() {
    let model = weather_model();
    let selector = Selector::parse("operation [trait|readonly]").unwrap();
    let get_city = model.get_shape(&sid("GetCity")).unwrap();
    let city = model.get_shape(&sid("City")).unwrap();
    assert!(selector.matches(&model, get_city));
    assert!(!selector.matches(&model, city));
}

#[test]
fn test_result_limit_stops_early() {
    let model = weather_model();
    let selector = Selector::parse("member").unwrap();
    let config = SelectorConfig::default().with_result_limit(3);
    let limited = selector.select_with(&model, &config);
    assert_eq!(limited.len(), 3);

    let all = selector.select(&model);
    assert_eq!(&all[..3], &limited[..]);
}

#[test]
fn test_compile_against_model() {
    let model = weather_model();
    assert!(Selector::compile_for_model("[trait|required]", &model).is_ok());

    let err = Selector::compile_for_model("[trait|example.weather#unknown]", &model).unwrap_err();
    assert_eq!(
        err,
        SelectorError::Semantic(SemanticError::UnknownTrait(sid("unknown")))
    );
}

#[test]
fn test_syntax_errors_carry_positions() {
    let err = Selector::parse("structure > member [trait|").unwrap_err();
    match err {
        SelectorError::Syntax(syntax) => {
            assert_eq!(syntax.position, 26);
            assert_eq!(syntax.expression, "structure > member [trait|");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }

    assert!(matches!(
        Selector::parse("widget").unwrap_err(),
        SelectorError::Semantic(SemanticError::UnknownShapeType(_))
    ));
    assert!(matches!(
        Selector::parse(":nope(string)").unwrap_err(),
        SelectorError::Semantic(SemanticError::UnknownFunction(_))
    ));
}

#[test]
fn test_batch_evaluation() {
    let model = weather_model();
    let batch = SelectorBatch::parse_all(["list", "service", "[trait|sensitive]"]).unwrap();
    let results = batch.select_all(&model);

    assert_eq!(results.len(), 3);
    assert_eq!(results[1].len(), 1);
    assert_eq!(results[1][0].id(), &sid("Weather"));
    // Only Password carries `sensitive`
    assert_eq!(results[2].len(), 1);
}
