//! Test fixtures
//!
//! A small weather service model exercising every shape kind.

use serde_json::json;
use shapegraph_core::{Model, ModelBuilder, ShapeBuilder, ShapeId, Trait};

pub const NAMESPACE: &str = "example.weather";

/// Parse a shape id, relative ids resolve against the fixture namespace
pub fn sid(text: &str) -> ShapeId {
    ShapeId::from_relative(text, NAMESPACE).unwrap()
}

pub fn prelude(name: &str) -> ShapeId {
    ShapeId::prelude(name)
}

fn required() -> Trait {
    Trait::annotation(prelude("required"))
}

/// Shape builders for the weather model, unbuilt so tests can extend them
pub fn weather_shapes() -> Vec<ShapeBuilder> {
    vec![
        ShapeBuilder::service(sid("Weather"))
            .version("2006-03-01")
            .bind_resource(sid("City"))
            .bind_operation(sid("GetCurrentTime")),
        ShapeBuilder::resource(sid("City"))
            .identifier("cityId", sid("CityId"))
            .read(sid("GetCity"))
            .list_operation(sid("ListCities")),
        ShapeBuilder::string(sid("CityId"))
            .with_trait(Trait::new(prelude("pattern"), json!("^[A-Za-z0-9 ]+$"))),
        ShapeBuilder::operation(sid("GetCity"))
            .annotate(prelude("readonly"))
            .input(sid("GetCityInput"))
            .output(sid("GetCityOutput"))
            .error(sid("NoSuchResource")),
        ShapeBuilder::structure(sid("GetCityInput"))
            .member_with_traits("cityId", sid("CityId"), [required()]),
        ShapeBuilder::structure(sid("GetCityOutput"))
            .member_with_traits("name", prelude("String"), [required()])
            .member("coordinates", sid("CityCoordinates")),
        ShapeBuilder::structure(sid("CityCoordinates"))
            .member("latitude", prelude("Float"))
            .member("longitude", prelude("Float")),
        ShapeBuilder::structure(sid("NoSuchResource"))
            .with_trait(Trait::new(prelude("error"), json!("client")))
            .member("resourceType", prelude("String")),
        ShapeBuilder::operation(sid("ListCities"))
            .annotate(prelude("readonly"))
            .input(sid("ListCitiesInput"))
            .output(sid("ListCitiesOutput")),
        ShapeBuilder::structure(sid("ListCitiesInput"))
            .member("nextToken", prelude("String"))
            .member("pageSize", prelude("Integer")),
        ShapeBuilder::structure(sid("ListCitiesOutput"))
            .member_with_traits("items", sid("CitySummaries"), [required()]),
        ShapeBuilder::list(sid("CitySummaries"), sid("CitySummary")),
        ShapeBuilder::structure(sid("CitySummary"))
            .member_with_traits("cityId", sid("CityId"), [required()])
            .member_with_traits("name", prelude("String"), [required()]),
        ShapeBuilder::operation(sid("GetCurrentTime"))
            .annotate(prelude("readonly"))
            .output(sid("GetCurrentTimeOutput")),
        ShapeBuilder::structure(sid("GetCurrentTimeOutput"))
            .member_with_traits("time", prelude("Timestamp"), [required()]),
        ShapeBuilder::set(sid("Tags"), prelude("String")),
        ShapeBuilder::string(sid("Password")).annotate(prelude("sensitive")),
        ShapeBuilder::structure(sid("Credentials"))
            .member("user", prelude("String"))
            .member("password", sid("Password")),
        ShapeBuilder::string(sid("LegacyId")).with_trait(Trait::new(
            prelude("deprecated"),
            json!({"message": "Use CityId", "since": "2.0"}),
        )),
    ]
}

pub fn weather_model() -> Model {
    ModelBuilder::new().add_shapes(weather_shapes()).build().unwrap()
}
