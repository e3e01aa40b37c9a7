//! Типы, общие для backend и клиента CRM: агрегаты, перечисления и контракты загрузки файлов

pub mod domain;
pub mod enums;
pub mod shared;
pub mod usecases;
