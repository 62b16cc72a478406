use crate::catalog::countries::CountryDirectory;
use crate::catalog::indicators::IndicatorCatalog;
use crate::config::Config;
use crate::foundation::error::GeodashResult;
use crate::geo::boundaries::BoundarySet;
use crate::provider::DataProvider;
use crate::provider::worldbank::WorldBankClient;

/// Immutable reference data shared by every run of a process.
///
/// Loading costs one country directory request and one boundary download; nothing here changes
/// afterwards.
#[derive(Clone, Debug)]
pub struct ReferenceData {
    pub indicators: IndicatorCatalog,
    pub countries: CountryDirectory,
    pub boundaries: BoundarySet,
}

impl ReferenceData {
    pub fn new(
        indicators: IndicatorCatalog,
        countries: CountryDirectory,
        boundaries: BoundarySet,
    ) -> Self {
        Self {
            indicators,
            countries,
            boundaries,
        }
    }

    /// Load the country directory and boundaries. Failure here is fatal for startup.
    #[tracing::instrument(skip_all)]
    pub fn load(client: &WorldBankClient, cfg: &Config) -> GeodashResult<Self> {
        let countries = CountryDirectory::from_countries(client.country_directory()?);
        tracing::info!(countries = countries.len(), "loaded country directory");
        let boundaries = BoundarySet::load(
            &cfg.boundaries,
            &cfg.boundary_id_property,
            &cfg.boundary_name_property,
            client.http(),
        )?;
        Ok(Self::new(IndicatorCatalog::builtin(), countries, boundaries))
    }
}
