//! Fixed category table and payment methods for daily expenses.
//!
//! The table is the single source of truth: creation and update of daily
//! expenses validate against it, and the categories endpoint serves it.

use once_cell::sync::Lazy;
use shared::CategoriesResponse;
use std::collections::{BTreeMap, HashMap};

/// Category table in declaration order. A subcategory may appear under more
/// than one category ("Roupas", "Material escolar"); lookups resolve to the
/// first category that declares it.
pub const CATEGORY_TABLE: &[(&str, &[&str])] = &[
    (
        "Alimentação",
        &[
            "Supermercado",
            "Feira / Hortifruti",
            "Açougue",
            "Padaria",
            "Delivery de mercado",
            "Restaurante",
            "Fast-food",
            "Café",
            "Delivery (iFood etc.)",
            "Bar",
        ],
    ),
    (
        "Transporte",
        &[
            "Combustível",
            "Uber / 99 / Taxi",
            "Transporte público",
            "Pedágio",
            "Estacionamento",
            "Manutenção do veículo",
            "Seguro do veículo",
            "Multas",
        ],
    ),
    (
        "Moradia",
        &[
            "Aluguel",
            "Condomínio",
            "Energia elétrica",
            "Água",
            "Gás",
            "Internet",
            "Manutenção doméstica",
            "Faxina",
            "Móveis",
            "Decoração",
        ],
    ),
    (
        "Compras Pessoais",
        &[
            "Roupas",
            "Calçados",
            "Acessórios",
            "Cosméticos",
            "Eletrônicos",
            "Itens para celular",
            "Presentes",
        ],
    ),
    (
        "Lazer e Entretenimento",
        &[
            "Cinema", "Shows", "Streaming", "Jogos", "Viagens", "Passeios", "Eventos",
        ],
    ),
    (
        "Saúde",
        &[
            "Farmácia",
            "Consultas médicas",
            "Exames",
            "Plano de saúde",
            "Terapia",
            "Academia",
            "Suplementos",
        ],
    ),
    (
        "Educação",
        &[
            "Cursos",
            "Escola / Faculdade",
            "Livros",
            "Material escolar",
            "Idiomas",
        ],
    ),
    (
        "Filhos / Dependentes",
        &[
            "Escola",
            "Lanche",
            "Material escolar",
            "Roupas",
            "Lazer infantil",
            "Saúde infantil",
        ],
    ),
    ("Pets", &["Ração", "Veterinário", "Banho e tosa", "Acessórios"]),
    (
        "Financeiro",
        &[
            "Juros",
            "Multas bancárias",
            "IOF",
            "Taxas",
            "Anuidade de cartão",
            "Parcelas",
        ],
    ),
    (
        "Presentes e Doações",
        &["Presente", "Aniversário", "Casamento", "Doações"],
    ),
    (
        "Assinaturas e Serviços",
        &["Streaming", "Apps", "SaaS", "Clube de assinatura"],
    ),
    (
        "Trabalho",
        &[
            "Reembolso pendente",
            "Almoço corporativo",
            "Ferramentas",
            "Transporte trabalho",
        ],
    ),
    ("Outros", &["Outros"]),
];

pub const PAYMENT_METHODS: &[&str] = &[
    "Dinheiro",
    "Cartão de Crédito",
    "Cartão de Débito",
    "Pix",
    "Vale Alimentação",
    "Vale Refeição",
];

// Subcategory -> parent category, first declaration wins.
static SUBCATEGORY_INDEX: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (category, subcategories) in CATEGORY_TABLE {
        for subcategory in *subcategories {
            index.entry(*subcategory).or_insert(*category);
        }
    }
    index
});

/// Parent category of a subcategory, or `None` if it is not in the table.
pub fn category_for_subcategory(subcategoria: &str) -> Option<&'static str> {
    SUBCATEGORY_INDEX.get(subcategoria).copied()
}

pub fn is_valid_payment_method(metodo: &str) -> bool {
    PAYMENT_METHODS.contains(&metodo)
}

/// The full table and payment methods as served by the categories endpoint.
pub fn categories_response() -> CategoriesResponse {
    let categorias: BTreeMap<String, Vec<String>> = CATEGORY_TABLE
        .iter()
        .map(|(category, subcategories)| {
            (
                (*category).to_string(),
                subcategories.iter().map(|s| (*s).to_string()).collect(),
            )
        })
        .collect();

    CategoriesResponse {
        categorias,
        metodos_pagamento: PAYMENT_METHODS.iter().map(|m| (*m).to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_subcategory_resolves() {
        assert_eq!(category_for_subcategory("Supermercado"), Some("Alimentação"));
        assert_eq!(category_for_subcategory("Aluguel"), Some("Moradia"));
        assert_eq!(category_for_subcategory("Outros"), Some("Outros"));
    }

    #[test]
    fn test_unknown_subcategory_is_none() {
        assert_eq!(category_for_subcategory("Foguete"), None);
        assert_eq!(category_for_subcategory(""), None);
        // Lookup is exact, not case-insensitive
        assert_eq!(category_for_subcategory("supermercado"), None);
    }

    #[test]
    fn test_duplicate_subcategories_resolve_to_first_declaration() {
        assert_eq!(category_for_subcategory("Roupas"), Some("Compras Pessoais"));
        assert_eq!(category_for_subcategory("Material escolar"), Some("Educação"));
        assert_eq!(
            category_for_subcategory("Streaming"),
            Some("Lazer e Entretenimento")
        );
        assert_eq!(
            category_for_subcategory("Acessórios"),
            Some("Compras Pessoais")
        );
    }

    #[test]
    fn test_payment_methods() {
        assert!(is_valid_payment_method("Pix"));
        assert!(is_valid_payment_method("Cartão de Crédito"));
        assert!(!is_valid_payment_method("Cheque"));
    }

    #[test]
    fn test_categories_response_covers_whole_table() {
        let response = categories_response();
        assert_eq!(response.categorias.len(), CATEGORY_TABLE.len());
        assert_eq!(response.metodos_pagamento.len(), PAYMENT_METHODS.len());
        assert_eq!(
            response.categorias["Pets"],
            vec!["Ração", "Veterinário", "Banho e tosa", "Acessórios"]
        );
    }
}
