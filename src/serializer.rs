//! Turns loaded rows into JSON, following relationship edges only where [`Rules`] allow.
//!
//! Restaurant, RestaurantPizza and Pizza form a cyclic graph
//! (`restaurant.restaurant_pizzas[].restaurant` is the restaurant again), so nothing is
//! nested by default. Callers name the edges they want as dotted paths relative to the
//! root, e.g. `restaurant_pizzas.pizza`, and may exclude paths with a leading `-`.
//!
//! Path segments: a name, `*` (any single edge) or `**` (any number of edges).
//! An edge is followed when an include rule reaches it (or reaches past it) and no
//! exclude rule matches it or one of its ancestors. Independently of rules, an edge
//! never leads back to a row already on the current branch, so output is always finite.

use crate::models::{Pizza, Restaurant, RestaurantPizza};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Identity of one row in a [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Restaurant(i64),
    Pizza(i64),
    RestaurantPizza(i64),
}

enum Edge {
    One(Node),
    Many(Vec<Node>),
}

/// Snapshot of the rows a response may draw from. Edges only reach rows added here.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    restaurants: BTreeMap<i64, Restaurant>,
    pizzas: BTreeMap<i64, Pizza>,
    restaurant_pizzas: BTreeMap<i64, RestaurantPizza>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_restaurant(&mut self, row: Restaurant) -> Node {
        let node = Node::Restaurant(row.id);
        self.restaurants.insert(row.id, row);
        node
    }

    pub fn add_pizza(&mut self, row: Pizza) -> Node {
        let node = Node::Pizza(row.id);
        self.pizzas.insert(row.id, row);
        node
    }

    pub fn add_restaurant_pizza(&mut self, row: RestaurantPizza) -> Node {
        let node = Node::RestaurantPizza(row.id);
        self.restaurant_pizzas.insert(row.id, row);
        node
    }

    pub fn extend_restaurants(&mut self, rows: impl IntoIterator<Item = Restaurant>) -> Vec<Node> {
        rows.into_iter().map(|r| self.add_restaurant(r)).collect()
    }

    pub fn extend_pizzas(&mut self, rows: impl IntoIterator<Item = Pizza>) -> Vec<Node> {
        rows.into_iter().map(|p| self.add_pizza(p)).collect()
    }

    pub fn extend_restaurant_pizzas(&mut self, rows: impl IntoIterator<Item = RestaurantPizza>) -> Vec<Node> {
        rows.into_iter().map(|rp| self.add_restaurant_pizza(rp)).collect()
    }

    fn contains(&self, node: Node) -> bool {
        match node {
            Node::Restaurant(id) => self.restaurants.contains_key(&id),
            Node::Pizza(id) => self.pizzas.contains_key(&id),
            Node::RestaurantPizza(id) => self.restaurant_pizzas.contains_key(&id),
        }
    }

    fn scalars(&self, node: Node) -> Option<Map<String, Value>> {
        match node {
            Node::Restaurant(id) => self.restaurants.get(&id).map(object),
            Node::Pizza(id) => self.pizzas.get(&id).map(object),
            Node::RestaurantPizza(id) => self.restaurant_pizzas.get(&id).map(object),
        }
    }

    fn edges(&self, node: Node) -> Vec<(&'static str, Edge)> {
        match node {
            Node::Restaurant(id) => vec![(
                "restaurant_pizzas",
                Edge::Many(self.join_rows(|rp| rp.restaurant_id == id)),
            )],
            Node::Pizza(id) => vec![(
                "restaurant_pizzas",
                Edge::Many(self.join_rows(|rp| rp.pizza_id == id)),
            )],
            Node::RestaurantPizza(id) => match self.restaurant_pizzas.get(&id) {
                Some(rp) => vec![
                    ("restaurant", Edge::One(Node::Restaurant(rp.restaurant_id))),
                    ("pizza", Edge::One(Node::Pizza(rp.pizza_id))),
                ],
                None => Vec::new(),
            },
        }
    }

    fn join_rows(&self, pred: impl Fn(&RestaurantPizza) -> bool) -> Vec<Node> {
        self.restaurant_pizzas
            .values()
            .filter(|rp| pred(rp))
            .map(|rp| Node::RestaurantPizza(rp.id))
            .collect()
    }
}

fn object<T: Serialize>(row: &T) -> Map<String, Value> {
    match serde_json::to_value(row) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Name(String),
    Any,
    AnyDepth,
}

impl Segment {
    fn parse(s: &str) -> Self {
        match s {
            "*" => Segment::Any,
            "**" => Segment::AnyDepth,
            name => Segment::Name(name.to_string()),
        }
    }
}

type Pattern = Vec<Segment>;

fn parse_pattern(path: &str) -> Pattern {
    path.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Segment::parse)
        .collect()
}

/// Glob-match `path` against `pattern`. With `partial`, a path that could still be
/// extended into a match also counts.
fn glob(pattern: &[Segment], path: &[&str], partial: bool) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => (0..=path.len()).any(|skip| glob(rest, &path[skip..], partial)),
        Some((seg, rest)) => match path.split_first() {
            None => partial,
            Some((head, tail)) => {
                let hit = match seg {
                    Segment::Name(name) => name == head,
                    _ => true,
                };
                hit && glob(rest, tail, partial)
            }
        },
    }
}

/// Which relationship edges to traverse. The default follows none.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rules {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl Rules {
    /// Scalars only.
    pub fn shallow() -> Self {
        Self::default()
    }

    /// Parse rule strings: `path` or `+path` includes, `-path` excludes.
    pub fn parse<'a>(rules: impl IntoIterator<Item = &'a str>) -> Self {
        rules.into_iter().fold(Self::default(), |acc, rule| match rule.trim() {
            r if r.starts_with('-') => acc.exclude(&r[1..]),
            r => acc.include(r.trim_start_matches('+')),
        })
    }

    pub fn include(mut self, path: &str) -> Self {
        let pattern = parse_pattern(path);
        if !pattern.is_empty() {
            self.include.push(pattern);
        }
        self
    }

    pub fn exclude(mut self, path: &str) -> Self {
        let pattern = parse_pattern(path);
        if !pattern.is_empty() {
            self.exclude.push(pattern);
        }
        self
    }

    /// Single restaurant: its join rows with their pizza, without the way back to the restaurant.
    pub fn restaurant_detail() -> Self {
        Self::parse(["restaurant_pizzas.*", "-restaurant_pizzas.restaurant"])
    }

    /// Freshly created join row: both ends, each shallow.
    pub fn restaurant_pizza_created() -> Self {
        Self::parse(["*"])
    }

    pub fn follows(&self, path: &[&str]) -> bool {
        let included = self.include.iter().any(|p| glob(p, path, true));
        let excluded = self
            .exclude
            .iter()
            .any(|p| (1..=path.len()).any(|len| glob(p, &path[..len], false)));
        included && !excluded
    }

    /// Serialize one row. Unknown roots become `null`.
    pub fn to_value(&self, graph: &Graph, root: Node) -> Value {
        let mut path = Vec::new();
        let mut branch = Vec::new();
        self.walk(graph, root, &mut path, &mut branch)
    }

    pub fn to_values(&self, graph: &Graph, roots: &[Node]) -> Value {
        Value::Array(roots.iter().map(|&n| self.to_value(graph, n)).collect())
    }

    fn walk(&self, graph: &Graph, node: Node, path: &mut Vec<&'static str>, branch: &mut Vec<Node>) -> Value {
        let Some(mut map) = graph.scalars(node) else {
            return Value::Null;
        };
        branch.push(node);
        for (name, edge) in graph.edges(node) {
            path.push(name);
            if self.follows(path) {
                match edge {
                    Edge::One(target) if branch.contains(&target) => {}
                    Edge::One(target) if !graph.contains(target) => {
                        map.insert(name.to_string(), Value::Null);
                    }
                    Edge::One(target) => {
                        let nested = self.walk(graph, target, path, branch);
                        map.insert(name.to_string(), nested);
                    }
                    Edge::Many(targets) => {
                        let mut items = Vec::with_capacity(targets.len());
                        for target in targets {
                            if !branch.contains(&target) {
                                items.push(self.walk(graph, target, path, branch));
                            }
                        }
                        map.insert(name.to_string(), Value::Array(items));
                    }
                }
            }
            path.pop();
        }
        branch.pop();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;
    use serde_json::json;

    fn sample() -> (Graph, Node) {
        let mut graph = Graph::new();
        let root = graph.add_restaurant(Restaurant {
            id: 1,
            name: "Karen's Pizza Shack".into(),
            address: "address1".into(),
        });
        graph.add_restaurant(Restaurant {
            id: 2,
            name: "Sanjay's Pizza".into(),
            address: "address2".into(),
        });
        graph.add_pizza(Pizza {
            id: 1,
            name: "Emma".into(),
            ingredients: "Dough, Tomato Sauce, Cheese".into(),
        });
        for (id, restaurant_id) in [(1, 1), (2, 2)] {
            graph.add_restaurant_pizza(RestaurantPizza {
                id,
                price: Price::new(5.0).unwrap(),
                restaurant_id,
                pizza_id: 1,
            });
        }
        (graph, root)
    }

    fn contains_restaurant_key(v: &Value) -> bool {
        match v {
            Value::Object(m) => m.contains_key("restaurant") || m.values().any(contains_restaurant_key),
            Value::Array(a) => a.iter().any(contains_restaurant_key),
            _ => false,
        }
    }

    #[test]
    fn default_rules_are_shallow() {
        let (graph, root) = sample();
        assert_eq!(
            Rules::default().to_value(&graph, root),
            json!({"id": 1, "name": "Karen's Pizza Shack", "address": "address1"})
        );
    }

    #[test]
    fn detail_view_nests_pizza_without_back_edge() {
        let (graph, root) = sample();
        let v = Rules::restaurant_detail().to_value(&graph, root);
        assert_eq!(
            v,
            json!({
                "id": 1,
                "name": "Karen's Pizza Shack",
                "address": "address1",
                "restaurant_pizzas": [{
                    "id": 1,
                    "price": 5,
                    "restaurant_id": 1,
                    "pizza_id": 1,
                    "pizza": {"id": 1, "name": "Emma", "ingredients": "Dough, Tomato Sauce, Cheese"}
                }]
            })
        );
        assert!(!contains_restaurant_key(&v));
    }

    #[test]
    fn created_view_includes_both_ends_shallow() {
        let (graph, _) = sample();
        let v = Rules::restaurant_pizza_created().to_value(&graph, Node::RestaurantPizza(2));
        assert_eq!(v["restaurant"], json!({"id": 2, "name": "Sanjay's Pizza", "address": "address2"}));
        assert_eq!(v["pizza"]["id"], json!(1));
        assert!(v["pizza"].get("restaurant_pizzas").is_none());
    }

    #[test]
    fn recursive_rules_terminate_and_never_revisit_the_branch() {
        let (graph, root) = sample();
        let v = Rules::parse(["**"]).to_value(&graph, root);
        let rp = &v["restaurant_pizzas"][0];
        assert!(rp.get("restaurant").is_none());
        // reaches the other restaurant through the shared pizza, but stops there
        let other = &rp["pizza"]["restaurant_pizzas"][0];
        assert_eq!(other["id"], json!(2));
        assert_eq!(other["restaurant"]["id"], json!(2));
        assert!(other["restaurant"]["restaurant_pizzas"].as_array().unwrap().is_empty());
    }

    #[test]
    fn exclusion_covers_descendants() {
        let rules = Rules::parse(["**", "-restaurant_pizzas.pizza"]);
        assert!(rules.follows(&["restaurant_pizzas"]));
        assert!(!rules.follows(&["restaurant_pizzas", "pizza"]));
        assert!(!rules.follows(&["restaurant_pizzas", "pizza", "restaurant_pizzas"]));
    }

    #[test]
    fn deeper_include_implies_its_prefix() {
        let rules = Rules::parse(["+restaurant_pizzas.pizza"]);
        assert!(rules.follows(&["restaurant_pizzas"]));
        assert!(rules.follows(&["restaurant_pizzas", "pizza"]));
        assert!(!rules.follows(&["restaurant_pizzas", "restaurant"]));
    }

    #[test]
    fn missing_to_one_target_is_null() {
        let mut graph = Graph::new();
        let node = graph.add_restaurant_pizza(RestaurantPizza {
            id: 7,
            price: Price::new(12.5).unwrap(),
            restaurant_id: 3,
            pizza_id: 4,
        });
        let v = Rules::restaurant_pizza_created().to_value(&graph, node);
        assert_eq!(v["price"], json!(12.5));
        assert_eq!(v["restaurant"], Value::Null);
        assert_eq!(v["pizza"], Value::Null);
    }

    #[test]
    fn unknown_root_is_null() {
        assert_eq!(Rules::default().to_value(&Graph::new(), Node::Pizza(1)), Value::Null);
    }
}
