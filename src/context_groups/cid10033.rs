context_group! {
    /// CID 10033 CT Reconstruction Algorithm.
    CtReconstructionAlgorithm: CID "10033", version "20130617", uid "1.2.840.10008.6.1.881",
    extensible true, "CT Reconstruction Algorithm" {
        FilteredBackProjection => ("113962", "DCM", "Filtered Back Projection"),
        IterativeReconstruction => ("113963", "DCM", "Iterative Reconstruction"),
    }
}

impl CtReconstructionAlgorithm {
    /// Maps a Reconstruction Algorithm (0018,9315) defined term.
    #[must_use]
    pub fn from_reconstruction_algorithm(algorithm: &str) -> Option<Self> {
        match algorithm.trim() {
            "FILTER_BACK_PROJ" => Some(Self::FilteredBackProjection),
            "ITERATIVE" => Some(Self::IterativeReconstruction),
            _ => None,
        }
    }
}
