// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含HTTP接口的请求与响应对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体和爬取编排服务
pub mod domain;

/// 引擎模块
///
/// 页面抓取器、身份轮换与请求间隔策略
pub mod engines;

/// 基础设施模块
///
/// 诊断文件与结果导出
pub mod infrastructure;

/// 表示层模块
///
/// HTTP路由、处理器和错误响应
pub mod presentation;

/// 工具模块
pub mod utils;
