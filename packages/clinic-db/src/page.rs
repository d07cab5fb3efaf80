//! Paginação das listagens
//!
//! `PageRequest` descreve a página pedida (índice, tamanho, ordenação) e
//! `Page` carrega o conteúdo mais os metadados de navegação.

use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// Tamanho de página padrão
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Maior tamanho de página aceito
pub const MAX_PAGE_SIZE: u32 = 100;

/// Direção de ordenação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Ordenação por uma propriedade da entidade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub property: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    /// Interpreta `propriedade` ou `propriedade,asc|desc`
    pub fn parse(value: &str) -> Result<Self, DbError> {
        let mut parts = value.split(',').map(str::trim);
        let property = parts.next().unwrap_or_default();
        if property.is_empty() {
            return Err(DbError::InvalidArgument(
                "sort: propriedade de ordenação vazia".to_string(),
            ));
        }

        let direction = match parts.next().map(|d| d.to_ascii_lowercase()).as_deref() {
            None | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(other) => {
                return Err(DbError::InvalidArgument(format!(
                    "sort: direção de ordenação inválida: {}",
                    other
                )))
            }
        };

        if parts.next().is_some() {
            return Err(DbError::InvalidArgument(format!(
                "sort: formato de ordenação inválido: {}",
                value
            )));
        }

        Ok(Self {
            property: property.to_string(),
            direction,
        })
    }
}

/// Página pedida pelo cliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Índice da página, começando em zero
    pub page: u32,
    /// Quantidade de registros por página
    pub size: u32,
    pub sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: Option<Sort>) -> Self {
        Self { page, size, sort }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Monta a cláusula ORDER BY a partir de uma lista de colunas permitidas.
    /// O `id` entra sempre como último critério de desempate.
    pub(crate) fn order_by(&self, sortable: &[&str], default_property: &str) -> Result<String, DbError> {
        let sort = self
            .sort
            .clone()
            .unwrap_or_else(|| Sort::asc(default_property));

        let column = sortable
            .iter()
            .find(|column| **column == sort.property)
            .ok_or_else(|| {
                DbError::InvalidArgument(format!(
                    "sort: propriedade de ordenação desconhecida: {}",
                    sort.property
                ))
            })?;

        if *column == "id" {
            return Ok(format!("id {}", sort.direction.as_sql()));
        }
        Ok(format!("{} {}, id ASC", column, sort.direction.as_sql()))
    }
}

/// Uma página de resultados
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u32,
    pub size: u32,
    pub number_of_elements: u32,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = request.size.max(1);
        let total_pages = total_elements.div_ceil(u64::from(size));
        let number_of_elements = content.len() as u32;

        Self {
            first: request.page == 0,
            last: u64::from(request.page) + 1 >= total_pages,
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            number: request.page,
            size: request.size,
            number_of_elements,
        }
    }

    /// Converte o conteúdo mantendo os metadados
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}
