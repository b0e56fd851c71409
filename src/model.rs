use strum::{Display, EnumString};

/// The regional transportation models served by this API. Each model carries
/// its own zone boundary dataset and batch file trees, and the datasets don't
/// agree on the attribute holding the zone id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TravelModel {
    Passenger,
    Freight,
}

impl TravelModel {
    pub const ALL: [TravelModel; 2] = [TravelModel::Passenger, TravelModel::Freight];

    pub fn zone_file_name(&self) -> &'static str {
        match self {
            TravelModel::Passenger => "passenger.geojson",
            TravelModel::Freight => "freight.geojson",
        }
    }

    pub fn zone_id_attribute(&self) -> &'static str {
        match self {
            TravelModel::Passenger => "taz",
            TravelModel::Freight => "TAZ22",
        }
    }
}

#[cfg(test)]
mod test {
    use super::TravelModel;
    use std::str::FromStr;

    #[test]
    fn parse_path_segment() {
        assert_eq!(
            TravelModel::Passenger,
            TravelModel::from_str("passenger").unwrap()
        );
        assert_eq!(
            TravelModel::Freight,
            TravelModel::from_str("freight").unwrap()
        );
        assert!(TravelModel::from_str("transit").is_err());
    }

    #[test]
    fn display_matches_dir_layout() {
        assert_eq!("passenger", TravelModel::Passenger.to_string());
        assert_eq!("freight", TravelModel::Freight.to_string());
    }
}
