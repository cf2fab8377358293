//! Fixed schema of importable product attributes.
//!
//! This table is the authoritative contract for mapping and validation; keys,
//! labels, required flags and types must stay stable because templates and
//! issue reports are derived from it.

use crate::models::DataType;

#[derive(Debug, Clone, Copy)]
pub struct TargetField {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub data_type: DataType,
}

pub const PRODUCT_FIELDS: &[TargetField] = &[
    TargetField {
        key: "name",
        label: "Nombre del producto",
        required: true,
        data_type: DataType::Text,
    },
    TargetField {
        key: "sku",
        label: "SKU",
        required: true,
        data_type: DataType::Text,
    },
    TargetField {
        key: "description",
        label: "Descripción",
        required: false,
        data_type: DataType::Text,
    },
    TargetField {
        key: "price",
        label: "Precio",
        required: true,
        data_type: DataType::Number,
    },
    TargetField {
        key: "compare_price",
        label: "Precio original",
        required: false,
        data_type: DataType::Number,
    },
    TargetField {
        key: "cost",
        label: "Costo",
        required: false,
        data_type: DataType::Number,
    },
    TargetField {
        key: "stock",
        label: "Stock",
        required: true,
        data_type: DataType::Number,
    },
    TargetField {
        key: "category",
        label: "Categoría",
        required: false,
        data_type: DataType::Text,
    },
    TargetField {
        key: "brand",
        label: "Marca",
        required: false,
        data_type: DataType::Text,
    },
    TargetField {
        key: "weight",
        label: "Peso (kg)",
        required: false,
        data_type: DataType::Number,
    },
    TargetField {
        key: "length",
        label: "Largo (cm)",
        required: false,
        data_type: DataType::Number,
    },
    TargetField {
        key: "width",
        label: "Ancho (cm)",
        required: false,
        data_type: DataType::Number,
    },
    TargetField {
        key: "height",
        label: "Alto (cm)",
        required: false,
        data_type: DataType::Number,
    },
    TargetField {
        key: "image_url",
        label: "URL imagen principal",
        required: false,
        data_type: DataType::Url,
    },
    TargetField {
        key: "image_url_2",
        label: "URL imagen 2",
        required: false,
        data_type: DataType::Url,
    },
    TargetField {
        key: "image_url_3",
        label: "URL imagen 3",
        required: false,
        data_type: DataType::Url,
    },
    TargetField {
        key: "tags",
        label: "Etiquetas (separadas por coma)",
        required: false,
        data_type: DataType::Text,
    },
    TargetField {
        key: "active",
        label: "Activo (true/false)",
        required: false,
        data_type: DataType::Boolean,
    },
    TargetField {
        key: "featured",
        label: "Destacado (true/false)",
        required: false,
        data_type: DataType::Boolean,
    },
    TargetField {
        key: "seo_title",
        label: "Título SEO",
        required: false,
        data_type: DataType::Text,
    },
    TargetField {
        key: "seo_description",
        label: "Descripción SEO",
        required: false,
        data_type: DataType::Text,
    },
];

pub fn find_field(key: &str) -> Option<&'static TargetField> {
    PRODUCT_FIELDS.iter().find(|f| f.key == key)
}

/// Required fields in catalog order.
pub fn required_fields() -> impl Iterator<Item = &'static TargetField> {
    PRODUCT_FIELDS.iter().filter(|f| f.required)
}
