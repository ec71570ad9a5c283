use crate::options::{DetailLevel, GenerationOptions};
use otm_model::{EntityId, Model};
use tracing::{trace, warn};

/// Facet used to represent `facet`'s owning object in an example.
///
/// A preferred facet configured for the owner wins when it names a facet of
/// this model; any other override is ignored with a warning. Contextual facets,
/// and any facet outside the owner's detail chain, are used as given. On the
/// detail chain (most detailed first):
///
/// * `Maximum` picks the most detailed facet declaring content, or the most
///   detailed facet if none does
/// * `Minimum` starts at `facet` and moves toward less detail while the
///   candidate declares no content, stopping at the least detailed facet
pub fn select_example_facet(model: &Model, options: &GenerationOptions, facet: EntityId) -> EntityId {
    let owner = model.owning_object(facet);
    if let Some(preferred) = options.preferred_facets.get(&owner).copied() {
        let is_facet = model
            .get(preferred)
            .map(|entity| entity.as_facet().is_some())
            .unwrap_or(false);
        if is_facet {
            return preferred;
        }
        warn!(
            "ignoring preferred facet {} for {}: not a facet of this model",
            preferred,
            model.name(owner)
        );
    }

    if model
        .facet_type(facet)
        .map(|facet_type| facet_type.is_contextual())
        .unwrap_or(false)
    {
        return facet;
    }

    let chain = model.detail_chain(owner);
    let Some(position) = chain.iter().position(|candidate| *candidate == facet) else {
        return facet;
    };

    let selected = match options.detail_level {
        DetailLevel::Maximum => chain
            .iter()
            .copied()
            .find(|candidate| model.declares_content(*candidate))
            .unwrap_or(chain[0]),
        DetailLevel::Minimum => {
            let mut index = position;
            while index + 1 < chain.len() && !model.declares_content(chain[index]) {
                index += 1;
            }
            chain[index]
        }
    };

    trace!(
        "selected facet {} for {} ({:?})",
        model.name(selected),
        model.name(owner),
        options.detail_level
    );
    selected
}
