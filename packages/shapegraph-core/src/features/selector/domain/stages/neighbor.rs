// Stage: neighbor traversal (`>`, `-[input, output]->`, `<`, `<-[member]-`, `~>`)
//
// Neighbors come from the model's relationship indexes, so expansion order
// is the fixed per-relationship order the index records. A neighbor
// reachable through several relationships is forwarded once.

use ahash::AHashSet;
use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::features::model::{Model, Relationship, RelationshipType};
use crate::features::selector::domain::context::Context;
use crate::features::selector::domain::stage::{Push, Receiver};
use crate::shared::models::{Shape, ShapeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborDirection {
    /// `>` / `-[..]->`
    Forward,
    /// `<` / `<-[..]-`
    Reverse,
    /// `~>`: transitive closure of forward relationships
    Recursive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborStep {
    direction: NeighborDirection,
    /// `None` follows every relationship except `trait`
    labels: Option<Vec<RelationshipType>>,
}

impl NeighborStep {
    pub fn new(direction: NeighborDirection, labels: Option<Vec<RelationshipType>>) -> Self {
        Self { direction, labels }
    }

    pub fn direction(&self) -> NeighborDirection {
        self.direction
    }

    pub fn labels(&self) -> Option<&[RelationshipType]> {
        self.labels.as_deref()
    }

    fn follows(&self, kind: RelationshipType) -> bool {
        match &self.labels {
            Some(labels) => labels.contains(&kind),
            None => kind.is_default_traversal(),
        }
    }

    /// Neighbor ids of `id` in this step's direction, first occurrence order
    fn step<'m>(&self, model: &'m Model, id: &ShapeId) -> Vec<&'m ShapeId> {
        let (rels, reverse): (&[Relationship], bool) = match self.direction {
            NeighborDirection::Forward | NeighborDirection::Recursive => {
                (model.neighbors(id), false)
            }
            NeighborDirection::Reverse => (model.reverse_neighbors(id), true),
        };

        let mut out: Vec<&ShapeId> = Vec::new();
        for rel in rels.iter().filter(|rel| self.follows(rel.kind)) {
            let next = if reverse { &rel.source } else { &rel.neighbor };
            if !out.contains(&next) {
                out.push(next);
            }
        }
        out
    }
}

impl Push for NeighborStep {
    fn push<'e>(
        &self,
        ctx: &Context<'e>,
        shape: &Arc<Shape>,
        next: &mut Receiver<'_, 'e>,
    ) -> ControlFlow<()> {
        let model = ctx.model();

        if self.direction != NeighborDirection::Recursive {
            for id in self.step(model, shape.id()) {
                if let Some(neighbor) = model.get_shape(id) {
                    next(ctx, neighbor)?;
                }
            }
            return ControlFlow::Continue(());
        }

        // Breadth-first; the start shape is only forwarded if a cycle
        // leads back to it.
        let mut seen: AHashSet<&ShapeId> = AHashSet::new();
        let mut queue: VecDeque<&ShapeId> = self.step(model, shape.id()).into();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(neighbor) = model.get_shape(id) {
                next(ctx, neighbor)?;
            }
            queue.extend(self.step(model, id));
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::selector::domain::stages::testing::{fixture_model, forwarded_from};
    use crate::features::selector::domain::Stage;

    fn step(direction: NeighborDirection, labels: Option<Vec<RelationshipType>>) -> Stage {
        Stage::Neighbor(NeighborStep::new(direction, labels))
    }

    #[test]
    fn test_forward_follows_declaration_order() {
        let model = fixture_model();
        let forward = step(NeighborDirection::Forward, None);

        assert_eq!(
            forwarded_from(&model, &forward, "ns#GetWidget"),
            vec!["ns#GetWidgetInput", "ns#Foo", "ns#NotFound"]
        );
        assert_eq!(
            forwarded_from(&model, &forward, "ns#Foo"),
            vec!["ns#Foo$bar", "ns#Foo$count"]
        );
        assert_eq!(
            forwarded_from(&model, &forward, "ns#Foo$bar"),
            vec!["ns#Str"]
        );
    }

    #[test]
    fn test_trait_relationship_is_opt_in() {
        let model = fixture_model();
        assert!(forwarded_from(&model, &step(NeighborDirection::Forward, None), "ns#Str").is_empty());
        assert_eq!(
            forwarded_from(
                &model,
                &step(NeighborDirection::Forward, Some(vec![RelationshipType::Trait])),
                "ns#Str"
            ),
            vec!["smithy.api#sensitive"]
        );
    }

    #[test]
    fn test_labeled_and_reverse() {
        let model = fixture_model();
        let identifiers = step(NeighborDirection::Forward, Some(vec![RelationshipType::Identifier]));
        assert_eq!(forwarded_from(&model, &identifiers, "ns#Widget"), vec!["ns#WidgetId"]);

        let users = step(NeighborDirection::Reverse, None);
        assert_eq!(
            forwarded_from(&model, &users, "ns#WidgetId"),
            vec!["ns#GetWidgetInput$widgetId", "ns#Widget"]
        );

        let outputs = step(NeighborDirection::Reverse, Some(vec![RelationshipType::Output]));
        assert_eq!(forwarded_from(&model, &outputs, "ns#Foo"), vec!["ns#GetWidget"]);
    }

    #[test]
    fn test_recursive_closure() {
        let model = fixture_model();
        let closure = step(NeighborDirection::Recursive, None);
        let reached = forwarded_from(&model, &closure, "ns#Svc");

        assert_eq!(reached[0], "ns#Widget");
        for expected in ["ns#GetWidget", "ns#Foo$bar", "ns#Str", "smithy.api#Integer"] {
            assert!(reached.contains(&expected.to_string()), "missing {expected}");
        }
        let mut unique = reached.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), reached.len());
        assert!(!reached.contains(&"smithy.api#sensitive".to_string()));
    }
}
