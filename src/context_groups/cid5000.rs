context_group! {
    /// CID 5000 Languages.
    Language: CID "5000", version "20150327", uid "1.2.840.10008.6.1.328",
    extensible true, "Languages" {
        Arabic => ("ar", "RFC5646", "Arabic"),
        Chinese => ("zh", "RFC5646", "Chinese"),
        Czech => ("cs", "RFC5646", "Czech"),
        Danish => ("da", "RFC5646", "Danish"),
        Dutch => ("nl", "RFC5646", "Dutch"),
        English => ("en", "RFC5646", "English"),
        Finnish => ("fi", "RFC5646", "Finnish"),
        French => ("fr", "RFC5646", "French"),
        German => ("de", "RFC5646", "German"),
        Greek => ("el", "RFC5646", "Greek"),
        Hungarian => ("hu", "RFC5646", "Hungarian"),
        Italian => ("it", "RFC5646", "Italian"),
        Japanese => ("ja", "RFC5646", "Japanese"),
        Korean => ("ko", "RFC5646", "Korean"),
        Norwegian => ("no", "RFC5646", "Norwegian"),
        Polish => ("pl", "RFC5646", "Polish"),
        Portuguese => ("pt", "RFC5646", "Portuguese"),
        Russian => ("ru", "RFC5646", "Russian"),
        Spanish => ("es", "RFC5646", "Spanish"),
        Swedish => ("sv", "RFC5646", "Swedish"),
        Turkish => ("tr", "RFC5646", "Turkish"),
    }
}
