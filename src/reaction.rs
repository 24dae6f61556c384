//! Reactions: reactant, agent, and product molecules

use crate::disp::native::write_native;
use crate::disp::smiles::{component_smiles, SmilesConfig, SmilesReport};
use crate::molecule::Molecule;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};
use tracing::*;

#[derive(Debug, Clone, Default)]
pub struct Reaction {
    pub reactants: Vec<Molecule>,
    pub agents: Vec<Molecule>,
    pub products: Vec<Molecule>,
}
impl Reaction {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn roles(&self) -> [&[Molecule]; 3] {
        [&self.reactants, &self.agents, &self.products]
    }
    pub fn is_empty(&self) -> bool {
        self.roles().iter().all(|r| r.is_empty())
    }

    /// Reaction SMILES, `reactants>agents>products`. Every component of every molecule in a role
    /// goes into one dot-separated list, sorted when canonical.
    #[instrument(level = "debug", skip(self))]
    pub fn to_smiles(&self, cfg: SmilesConfig) -> SmilesReport {
        let mut issues = Vec::new();
        let smiles = self
            .roles()
            .into_iter()
            .map(|role| {
                let parts = role
                    .iter()
                    .flat_map(|mol| component_smiles(mol, cfg, &mut issues))
                    .collect::<Vec<_>>();
                if cfg.canonical {
                    parts.into_iter().sorted_unstable().join(".")
                } else {
                    parts.join(".")
                }
            })
            .join(">");
        SmilesReport { smiles, issues }
    }

    /// Native text for each molecule, `|` between molecules of a role and `>` between roles
    pub fn to_native_text(&self) -> String {
        self.to_string()
    }
}
impl Display for Reaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, role) in self.roles().into_iter().enumerate() {
            if i > 0 {
                f.write_str(">")?;
            }
            for (j, mol) in role.iter().enumerate() {
                if j > 0 {
                    f.write_str("|")?;
                }
                write_native(mol, f)?;
            }
        }
        Ok(())
    }
}
