// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：客户端身份、抓取结果、商品与爬取状态
/// - 服务（services）：拦截检测、页面提取、分页与爬取编排
///
/// 领域层只依赖抓取器特质，不依赖具体的网络实现。
pub mod models;
pub mod services;
