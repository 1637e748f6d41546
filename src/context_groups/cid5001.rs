context_group! {
    /// CID 5001 Countries.
    Country: CID "5001", version "20150327", uid "1.2.840.10008.6.1.329",
    extensible true, "Countries" {
        Australia => ("AU", "ISO3166_1", "Australia"),
        Austria => ("AT", "ISO3166_1", "Austria"),
        Belgium => ("BE", "ISO3166_1", "Belgium"),
        Brazil => ("BR", "ISO3166_1", "Brazil"),
        Canada => ("CA", "ISO3166_1", "Canada"),
        China => ("CN", "ISO3166_1", "China"),
        Denmark => ("DK", "ISO3166_1", "Denmark"),
        Finland => ("FI", "ISO3166_1", "Finland"),
        France => ("FR", "ISO3166_1", "France"),
        Germany => ("DE", "ISO3166_1", "Germany"),
        India => ("IN", "ISO3166_1", "India"),
        Ireland => ("IE", "ISO3166_1", "Ireland"),
        Italy => ("IT", "ISO3166_1", "Italy"),
        Japan => ("JP", "ISO3166_1", "Japan"),
        Mexico => ("MX", "ISO3166_1", "Mexico"),
        Netherlands => ("NL", "ISO3166_1", "Netherlands"),
        NewZealand => ("NZ", "ISO3166_1", "New Zealand"),
        Norway => ("NO", "ISO3166_1", "Norway"),
        Poland => ("PL", "ISO3166_1", "Poland"),
        Portugal => ("PT", "ISO3166_1", "Portugal"),
        SouthKorea => ("KR", "ISO3166_1", "Korea, Republic of"),
        Spain => ("ES", "ISO3166_1", "Spain"),
        Sweden => ("SE", "ISO3166_1", "Sweden"),
        Switzerland => ("CH", "ISO3166_1", "Switzerland"),
        UnitedKingdom => ("GB", "ISO3166_1", "United Kingdom"),
        UnitedStates => ("US", "ISO3166_1", "United States"),
    }
}
