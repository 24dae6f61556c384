macro_rules! trace_capture {
    () => {
        use tracing_subscriber::filter::{LevelFilter, Targets};
        use tracing_subscriber::prelude::*;

        let targets = Targets::new()
            .with_target("molsketch::tests", LevelFilter::TRACE)
            .with_target("molsketch::parse", LevelFilter::INFO)
            .with_target("molsketch::canon", LevelFilter::TRACE)
            .with_target("molsketch::stereo", LevelFilter::DEBUG)
            .with_target("molsketch::disp", LevelFilter::DEBUG);

        let formatter = tracing_subscriber::fmt::layer().with_test_writer();

        let _guard = tracing_subscriber::registry()
            .with(targets)
            .with(formatter)
            .set_default();
    };
}

pub(super) use trace_capture;

/// Same atoms and bonds, ignoring coordinates and numbering
pub(super) fn same_structure(a: &Molecule, b: &Molecule) -> bool {
    petgraph::algo::is_isomorphic_matching(
        a.graph(),
        b.graph(),
        |x: &Atom, y: &Atom| x.kind == y.kind && x.charge == y.charge,
        |x: &Bond, y: &Bond| x.order == y.order,
    )
}

use crate::prelude::*;
