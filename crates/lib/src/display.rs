//! Tables of utility profiles.
use std::fmt::{self, Display};

use tabled::{builder::Builder, settings::Style};

use crate::{Alternative, UtilityProfile};

/// Settings for [`UtilityProfile::display`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Label of every voter. Voter `i` is labeled `i + 1` if not given.
    pub vmap: Option<Vec<String>>,
    /// Add the sum, minimum and maximum utility of every alternative.
    pub show_totals: bool,
}

impl DisplayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vmap(mut self, vmap: Vec<String>) -> Self {
        self.vmap = Some(vmap);
        self
    }

    pub fn show_totals(mut self, show_totals: bool) -> Self {
        self.show_totals = show_totals;
        self
    }
}

const DIVIDER: &str = "---";

fn cell(u: Option<f64>) -> String {
    u.map(|u| u.to_string()).unwrap_or_default()
}

impl<A: Alternative> UtilityProfile<A> {
    /// Render the profile as a table with one row for every voter and one
    /// column for every alternative. Alternatives a voter doesn't assign a
    /// utility are left blank.
    pub fn display(&self, options: &DisplayOptions) -> String {
        let mut builder = Builder::default();
        let names = self.domain().iter().map(|x| self.name(x));
        builder.push_record(std::iter::once("Voter".to_string()).chain(names));

        for (v, u) in self.utilities().into_iter().enumerate() {
            let label = match options.vmap.as_ref().and_then(|vmap| vmap.get(v)) {
                Some(label) => label.clone(),
                None => (v + 1).to_string(),
            };
            let values = self.domain().iter().map(|x| cell(u.utils().get(x).copied()));
            builder.push_record(std::iter::once(label).chain(values));
        }

        if options.show_totals {
            let divider = (0..=self.num_alternatives()).map(|_| DIVIDER.to_string());
            builder.push_record(divider);
            let totals: [(&str, fn(&Self, &A) -> Option<f64>); 3] =
                [("Sum", Self::util_sum), ("Min", Self::util_min), ("Max", Self::util_max)];
            for (label, total) in totals {
                let values = self.domain().iter().map(|x| cell(total(self, x)));
                builder.push_record(std::iter::once(label.to_string()).chain(values));
            }
        }

        let mut table = builder.build();
        table.with(Style::psql());
        table.to_string()
    }
}

impl<A: Alternative> Display for UtilityProfile<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display(&DisplayOptions::default()))
    }
}
