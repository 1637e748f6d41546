context_group! {
    /// CID 11 Route of Administration.
    RouteOfAdministration: CID "11", version "20100608", uid "1.2.840.10008.6.1.9",
    extensible true, "Route of Administration" {
        IntravenousRoute => ("G-D101", "SRT", "Intravenous route"),
        IntraArterialRoute => ("G-D102", "SRT", "Intra-arterial route"),
        IntramuscularRoute => ("G-D103", "SRT", "Intramuscular route"),
        SubcutaneousRoute => ("G-D104", "SRT", "Subcutaneous route"),
        IntracutaneousRoute => ("G-D105", "SRT", "Intracutaneous route"),
        IntraperitonealRoute => ("G-D106", "SRT", "Intraperitoneal route"),
        IntramedullaryRoute => ("G-D107", "SRT", "Intramedullary route"),
        IntrathecalRoute => ("G-D108", "SRT", "Intrathecal route"),
        IntraArticularRoute => ("G-D109", "SRT", "Intra-articular route"),
        IntraepithelialRoute => ("G-D111", "SRT", "Intraepithelial route"),
        TopicalRoute => ("G-D112", "SRT", "Topical route"),
        OralRoute => ("G-D140", "SRT", "Oral route"),
        TransluminalRoute => ("G-D142", "SRT", "Transluminal route"),
        IntraluminalRoute => ("G-D144", "SRT", "Intraluminal route"),
        ExtraluminalRoute => ("G-D146", "SRT", "Extraluminal route"),
        ByInhalation => ("G-D150", "SRT", "By inhalation"),
        PerRectum => ("G-D160", "SRT", "Per rectum"),
        VaginalRoute => ("G-D164", "SRT", "Vaginal route"),
        IntracoronaryRoute => ("G-D17C", "SRT", "Intracoronary route"),
        IntracardiacRoute => ("G-D173", "SRT", "Intracardiac route"),
        IntraventricularRouteCardiac => ("R-F2C86", "SRT", "Intraventricular route - cardiac"),
    }
}
