use super::code_to_region;
use crate::error::{ReportError, Result};
use crate::utils::MetadataReader;
use log::debug;
use std::collections::HashMap;
use std::path::Path;

const ENGLAND: &[&str] = &[
    "BARNSLEY", "BATH AND NORTH EAST SOMERSET", "BEDFORDSHIRE", "BIRMINGHAM",
    "BLACKBURN WITH DARWEN", "BLACKPOOL", "BOLTON", "BOURNEMOUTH", "BRACKNELL FOREST",
    "BRADFORD", "BRIGHTON AND HOVE", "BRISTOL", "BUCKINGHAMSHIRE", "BURY", "CALDERDALE",
    "CAMBRIDGESHIRE", "CENTRAL BEDFORDSHIRE", "CHESHIRE EAST", "CHESHIRE WEST AND CHESTER",
    "CORNWALL", "COVENTRY", "CUMBRIA", "DARLINGTON", "DERBY", "DERBYSHIRE", "DEVON",
    "DONCASTER", "DORSET", "DUDLEY", "DURHAM", "EAST RIDING OF YORKSHIRE", "EAST SUSSEX",
    "ESSEX", "GATESHEAD", "GLOUCESTERSHIRE", "GREATER LONDON", "HALTON", "HAMPSHIRE",
    "HARTLEPOOL", "HEREFORDSHIRE", "HERTFORDSHIRE", "ISLE OF WIGHT", "ISLES OF SCILLY", "KENT",
    "KINGSTON UPON HULL", "KIRKLEES", "KNOWSLEY", "LANCASHIRE", "LEEDS", "LEICESTER",
    "LEICESTERSHIRE", "LINCOLNSHIRE", "LUTON", "MANCHESTER", "MEDWAY", "MIDDLESBROUGH",
    "MILTON KEYNES", "NEWCASTLE UPON TYNE", "NORFOLK", "NORTH LINCOLNSHIRE", "NORTH SOMERSET",
    "NORTH TYNESIDE", "NORTH YORKSHIRE", "NORTHAMPTONSHIRE", "NORTHUMBERLAND", "NOTTINGHAM",
    "NOTTINGHAMSHIRE", "OLDHAM", "OXFORDSHIRE", "PETERBOROUGH", "PLYMOUTH", "POOLE",
    "PORTSMOUTH", "READING", "REDCAR AND CLEVELAND", "ROCHDALE", "ROTHERHAM", "RUTLAND",
    "SAINT HELENS", "SALFORD", "SANDWELL", "SEFTON", "SHEFFIELD", "SHROPSHIRE", "SLOUGH",
    "SOLIHULL", "SOMERSET", "SOUTH GLOUCESTERSHIRE", "SOUTH TYNESIDE", "SOUTHAMPTON",
    "SOUTHEND-ON-SEA", "STAFFORDSHIRE", "STOCKPORT", "STOCKTON-ON-TEES", "STOKE-ON-TRENT",
    "SUFFOLK", "SUNDERLAND", "SURREY", "SWINDON", "TAMESIDE", "TELFORD AND WREKIN",
    "THURROCK", "TORBAY", "TRAFFORD", "WAKEFIELD", "WALSALL", "WARRINGTON", "WARWICKSHIRE",
    "WEST BERKSHIRE", "WEST SUSSEX", "WIGAN", "WILTSHIRE", "WINDSOR AND MAIDENHEAD", "WIRRAL",
    "WOKINGHAM", "WOLVERHAMPTON", "WORCESTERSHIRE", "YORK",
];

const NORTHERN_IRELAND: &[&str] = &[
    "ANTRIM AND NEWTOWNABBEY", "ARMAGH, BANBRIDGE AND CRAIGAVON", "BELFAST",
    "CAUSEWAY COAST AND GLENS", "DERRY AND STRABANE", "FERMANAGH AND OMAGH",
    "LISBURN AND CASTLEREAGH", "MID AND EAST ANTRIM", "MID ULSTER", "NEWRY, MOURNE AND DOWN",
    "NORTH DOWN AND ARDS",
];

const SCOTLAND: &[&str] = &[
    "ABERDEEN", "ABERDEENSHIRE", "ANGUS", "ARGYLL AND BUTE", "CLACKMANNANSHIRE",
    "DUMFRIES AND GALLOWAY", "DUNDEE", "EAST AYRSHIRE", "EAST DUNBARTONSHIRE", "EAST LOTHIAN",
    "EAST RENFREWSHIRE", "EDINBURGH", "EILEAN SIAR", "FALKIRK", "FIFE", "GLASGOW", "HIGHLAND",
    "INVERCLYDE", "MIDLOTHIAN", "MORAY", "NORTH AYRSHIRE", "NORTH LANARKSHIRE",
    "ORKNEY ISLANDS", "PERTHSHIRE AND KINROSS", "RENFREWSHIRE", "SCOTTISH BORDERS",
    "SHETLAND ISLANDS", "SOUTH AYRSHIRE", "SOUTH LANARKSHIRE", "STIRLING",
    "WEST DUNBARTONSHIRE", "WEST LOTHIAN",
];

const WALES: &[&str] = &[
    "ANGLESEY", "BLAENAU GWENT", "BRIDGEND", "CAERPHILLY", "CARDIFF", "CARMARTHENSHIRE",
    "CEREDIGION", "CONWY", "DENBIGHSHIRE", "FLINTSHIRE", "GWYNEDD", "MERTHYR TYDFIL",
    "MONMOUTHSHIRE", "NEATH PORT TALBOT", "NEWPORT", "PEMBROKESHIRE", "POWYS",
    "RHONDDA, CYNON, TAFF", "SWANSEA", "TORFAEN", "VALE OF GLAMORGAN", "WREXHAM",
];

/// Admin-2 values that never name a real area.
const ILLEGAL_ADM2: &[&str] = &[
    "", "NOT FOUND", "NONE", "OTHER", "WALES", "UNKNOWN", "UNKNOWN SOURCE", "NA",
];

/// Admin-2 (county/council) to admin-1 (nation) lookup.
#[derive(Debug, Clone, Default)]
pub struct Adm2Lookup {
    official: HashMap<String, &'static str>,
    observed: HashMap<String, String>,
}

impl Adm2Lookup {
    /// The static council table only.
    pub fn official() -> Self {
        let mut official = HashMap::new();
        for (names, region) in [
            (ENGLAND, "England"),
            (NORTHERN_IRELAND, "Northern_Ireland"),
            (SCOTLAND, "Scotland"),
            (WALES, "Wales"),
        ] {
            for name in names {
                official.insert(name.to_string(), region);
            }
        }
        Self {
            official,
            observed: HashMap::new(),
        }
    }

    pub fn get(&self, adm2: &str) -> Option<&str> {
        let key = adm2.trim();
        if let Some(region) = self.official.get(&key.to_uppercase()) {
            return Some(region);
        }
        self.observed.get(key).map(String::as_str)
    }

    pub fn observed_len(&self) -> usize {
        self.observed.len()
    }

    /// Record an admin-2 name seen in background data. Names already in the
    /// static table and placeholder values are ignored.
    pub fn observe(&mut self, adm2: &str, adm1: &str) -> bool {
        let key = adm2.trim();
        let upper = key.to_uppercase();
        if ILLEGAL_ADM2.contains(&upper.as_str()) || self.official.contains_key(&upper) {
            return false;
        }
        self.observed.insert(key.to_string(), adm1.to_string());
        true
    }

    /// Extend the static table with admin-2 names found on domestic rows of
    /// the background metadata, whose `adm1` column carries a
    /// `<COUNTRY>-<CODE>` value. Without `adm1` and `adm2` columns only the
    /// static table is used.
    pub fn derive_from_background(path: &Path, domestic_country: &str) -> Result<Self> {
        let mut lookup = Self::official();
        let mut reader = MetadataReader::open(path)?;
        reader.require(&["country"])?;
        if !reader.has_column("adm1") || !reader.has_column("adm2") {
            debug!(
                "No adm1/adm2 columns in {}, using the static admin-2 table",
                path.display()
            );
            return Ok(lookup);
        }
        reader.for_each_row(|row| {
            if row.value("country") != domestic_country {
                return Ok(());
            }
            let raw_adm1 = row.value("adm1");
            let Some((_, code)) = raw_adm1.split_once('-') else {
                return Ok(());
            };
            let adm1 = code_to_region(code).ok_or_else(|| ReportError::UnknownAdminCode {
                code: code.to_string(),
                value: raw_adm1.to_string(),
            })?;
            lookup.observe(row.value("adm2"), adm1);
            Ok(())
        })?;
        debug!(
            "Derived {} additional admin-2 names from {}",
            lookup.observed_len(),
            path.display()
        );
        Ok(lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn official_table_is_case_insensitive() {
        let lookup = Adm2Lookup::official();
        assert_eq!(lookup.get("Fife"), Some("Scotland"));
        assert_eq!(lookup.get("BELFAST"), Some("Northern_Ireland"));
        assert_eq!(lookup.get("Atlantis"), None);
    }

    #[test]
    fn background_rows_extend_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("background.csv");
        fs::write(
            &path,
            "sequence_name,country,adm1,adm2\n\
             a,UK,UK-ENG,Hackney\n\
             b,UK,UK-SCT,FIFE\n\
             c,UK,UK-WLS,Unknown\n\
             d,France,FR-IDF,Paris\n",
        )
        .unwrap();
        let lookup = Adm2Lookup::derive_from_background(&path, "UK").unwrap();
        assert_eq!(lookup.get("Hackney"), Some("England"));
        assert_eq!(lookup.get("Unknown"), None);
        assert_eq!(lookup.get("Paris"), None);
        assert_eq!(lookup.observed_len(), 1);
    }

    #[test]
    fn background_without_admin_columns_keeps_the_static_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("background.csv");
        fs::write(&path, "sequence_name,sample_date,country
a,2021-01-01,UK
").unwrap();
        let lookup = Adm2Lookup::derive_from_background(&path, "UK").unwrap();
        assert_eq!(lookup.observed_len(), 0);
        assert_eq!(lookup.get("Cardiff"), Some("Wales"));
    }

    #[test]
    fn unknown_domestic_codes_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("background.csv");
        fs::write(&path, "sequence_name,country,adm1,adm2\na,UK,UK-XYZ,Leeds\n").unwrap();
        assert!(matches!(
            Adm2Lookup::derive_from_background(&path, "UK"),
            Err(ReportError::UnknownAdminCode { .. })
        ));
    }
}
