//! Well-known IRIs used by the metadata and reference checks, plus the
//! default prefix table for rendering short forms.

/// rdfs:label
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// owl:deprecated
pub const OWL_DEPRECATED: &str = "http://www.w3.org/2002/07/owl#deprecated";

// Dublin Core header properties.
pub const DC_TITLE: &str = "http://purl.org/dc/elements/1.1/title";
pub const DC_DESCRIPTION: &str = "http://purl.org/dc/elements/1.1/description";
pub const DC_LICENSE: &str = "http://purl.org/dc/elements/1.1/license";
pub const DC_CREATOR: &str = "http://purl.org/dc/elements/1.1/creator";

/// Textual definition (IAO:0000115).
pub const DEFINITION: &str = "http://purl.obolibrary.org/obo/IAO_0000115";

/// Definition editor / provenance (IAO:0000117).
pub const DEFINITION_EDITOR: &str = "http://purl.obolibrary.org/obo/IAO_0000117";

/// Replacement term for a merged/redirected identifier (IAO:0100001).
pub const TERM_REPLACED_BY: &str = "http://purl.obolibrary.org/obo/IAO_0100001";

// oboInOwl audit and namespace annotations.
pub const NAMESPACE_TAG: &str = "http://www.geneontology.org/formats/oboInOwl#hasOBONamespace";
pub const CREATED_BY: &str = "http://www.geneontology.org/formats/oboInOwl#created_by";
pub const CREATION_DATE: &str = "http://www.geneontology.org/formats/oboInOwl#creation_date";

/// Cross-reference property whose literal values are expected to be CURIEs.
pub const HAS_DBXREF: &str = "http://www.geneontology.org/formats/oboInOwl#hasDbXref";

// xsd datatypes relevant to report quoting.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_INT: &str = "http://www.w3.org/2001/XMLSchema#int";
pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// Datatypes rendered without quotes in report output.
pub const UNQUOTED_DATATYPES: &[&str] = &[
    XSD_BOOLEAN,
    XSD_INTEGER,
    XSD_INT,
    XSD_LONG,
    XSD_DECIMAL,
    XSD_FLOAT,
    XSD_DOUBLE,
    XSD_DATE,
    XSD_DATE_TIME,
];

/// Default `(prefix, expansion)` table, longest expansions first so that
/// short-form lookup can take the first match.
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("oboInOwl", "http://www.geneontology.org/formats/oboInOwl#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("obo", "http://purl.obolibrary.org/obo/"),
];
