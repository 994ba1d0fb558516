//! Contract interfaces generated via alloy's sol! macro.

use alloy::sol;

sol! {
    // Notional V2 router, storage layout of `updateVault`
    struct VaultConfigStorage {
        uint16 flags;
        uint16 borrowCurrencyId;
        uint32 minAccountBorrowSize;
        uint16 minCollateralRatioBPS;
        uint8 feeRate5BPS;
        uint8 liquidationRate;
        uint8 reserveFeeShare;
        uint8 maxBorrowMarketIndex;
        uint16 maxDeleverageCollateralRatioBPS;
        uint16[2] secondaryBorrowCurrencies;
        uint16 maxRequiredAccountCollateralRatioBPS;
    }

    struct AssetRateParameters {
        address rateOracle;
        int256 rate;
        int256 underlyingDecimals;
    }

    struct VaultConfig {
        address vault;
        uint16 flags;
        uint16 borrowCurrencyId;
        int256 minAccountBorrowSize;
        int256 minCollateralRatio;
        int256 feeRate;
        int256 liquidationRate;
        int256 reserveFeeShare;
        uint256 maxBorrowMarketIndex;
        int256 maxDeleverageCollateralRatio;
        uint16[2] secondaryBorrowCurrencies;
        AssetRateParameters assetRate;
        int256 maxRequiredAccountCollateralRatio;
    }

    struct MarketParameters {
        bytes32 storageSlot;
        uint256 maturity;
        int256 totalfCash;
        int256 totalAssetCash;
        int256 totalLiquidity;
        uint256 lastImpliedRate;
        uint256 oracleRate;
        uint256 previousTradeTime;
    }

    struct VaultState {
        uint256 maturity;
        int256 totalfCash;
        bool isSettled;
        uint256 totalVaultShares;
        uint256 totalAssetCash;
        uint256 totalStrategyTokens;
        int256 settlementStrategyTokenValue;
    }

    struct VaultAccount {
        int256 fCash;
        uint256 maturity;
        uint256 vaultShares;
        address account;
        int256 tempCashBalance;
    }

    #[sol(rpc)]
    interface INotional {
        function owner() external view returns (address);
        function upgradeTo(address newImplementation) external;
        function updateAssetRate(uint16 currencyId, address rateOracle) external;
        function updateVault(address vaultAddress, VaultConfigStorage calldata vaultConfig, uint80 maxPrimaryBorrowCapacity) external;
        function getActiveMarkets(uint16 currencyId) external view returns (MarketParameters[] memory);
        function getVaultConfig(address vault) external view returns (VaultConfig memory);
        function getVaultState(address vault, uint256 maturity) external view returns (VaultState memory);
        function getVaultAccount(address account, address vault) external view returns (VaultAccount memory);
        function enterVault(
            address account,
            address vault,
            uint256 depositAmountExternal,
            uint256 maturity,
            uint256 fCash,
            uint32 maxBorrowRate,
            bytes calldata vaultData
        ) external payable returns (uint256 strategyTokensAdded);
    }

    // Constructor argument of the Router implementation
    struct RouterParams {
        address governance;
        address views;
        address initializeMarket;
        address nTokenActions;
        address batchAction;
        address accountAction;
        address erc1155;
        address liquidateCurrency;
        address liquidatefCash;
        address cETH;
        address treasury;
        address calculationViews;
        address vaultAccountAction;
        address vaultAction;
    }

    struct TokenPermissions {
        bool allowSell;
        uint32 dexFlags;
        uint32 tradeTypeFlags;
    }

    #[sol(rpc)]
    interface ITradingModule {
        function setPriceOracle(address token, address oracle) external;
        function setTokenPermissions(address sender, address token, TokenPermissions calldata permissions) external;
        function priceOracles(address token) external view returns (address oracle, uint8 rateDecimals);
        function tokenWhitelist(address spender, address token) external view returns (bool allowSell, uint32 dexFlags, uint32 tradeTypeFlags);
    }

    #[sol(rpc)]
    interface IUpgradeable {
        function upgradeTo(address newImplementation) external;
        function getImplementation() external view returns (address);
    }

    struct StrategyVaultSettings {
        uint256 maxUnderlyingSurplus;
        uint32 settlementSlippageLimitPercent;
        uint32 postMaturitySettlementSlippageLimitPercent;
        uint32 emergencySettlementSlippageLimitPercent;
        uint32 maxRewardTradeSlippageLimitPercent;
        uint16 maxBalancerPoolShare;
        uint16 settlementCoolDownInMinutes;
        uint16 oraclePriceDeviationLimitPercent;
        uint16 balancerPoolSlippageLimitPercent;
    }

    struct InitParams {
        string name;
        uint16 borrowCurrencyId;
        StrategyVaultSettings settings;
    }

    #[sol(rpc)]
    interface IStrategyVault {
        function initialize(InitParams calldata params) external;
        function setStrategyVaultSettings(StrategyVaultSettings calldata settings) external;
        function convertStrategyToUnderlying(address account, uint256 strategyTokenAmount, uint256 maturity) external view returns (int256 underlyingValue);
        function name() external view returns (string memory);
        function decimals() external view returns (uint8);
    }

    // Vault implementation constructor arguments
    struct DeploymentParams {
        uint16 primaryBorrowCurrencyId;
        bytes32 balancerPoolId;
        address liquidityGauge;
        address tradingModule;
        uint32 settlementPeriodInSeconds;
    }

    struct AuraVaultDeploymentParams {
        address rewardPool;
        DeploymentParams baseParams;
    }

    #[sol(rpc)]
    interface IFlashLiquidator {
        function enableCurrencies(uint16[] calldata currencies) external;
    }

    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    #[sol(rpc)]
    interface ICToken {
        function balanceOf(address account) external view returns (uint256);
        function underlying() external view returns (address);
        function exchangeRateStored() external view returns (uint256);
    }
}
